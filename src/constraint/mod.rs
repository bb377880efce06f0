//! Value constraints attached to argument slots.
//!
//! A constraint is a predicate over a typed [`Value`] plus a human-readable description.
//! Constraints are type-checked against the slot's declared [`ValueType`] when the slot is
//! registered, and evaluated immediately after a value has been parsed and bound.
//!
//! ## Built-ins
//!
//! | Constraint              | Types            | Description text              |
//! |-------------------------|------------------|-------------------------------|
//! | [`LengthConstraint`]    | string           | `length [3...6]`              |
//! | [`RangeConstraint`]     | integer, float   | `[-2...150]`                  |
//! | [`EnumerationConstraint`] | any (ranges: numeric) | `{2, 3} [(-15...15)] ![(-3...3)]` |

use std::fmt;

use thiserror::Error;

use crate::value::{Value, ValueType};

mod enumeration;
mod length;
mod range;

pub use enumeration::EnumerationConstraint;
pub use length::LengthConstraint;
pub use range::{NumericRange, RangeConstraint};

/// A rejected value. The message always names the slot and the accepted set or bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConstraintViolation {
    pub slot: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(slot: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            message: message.into(),
        }
    }
}

/// A pluggable predicate over slot values.
///
/// Implementations must be immutable after construction; a registered grammar shares them
/// across parses and threads.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Whether this constraint can be attached to a slot of type `ty`.
    fn type_check(&self, ty: ValueType) -> bool;

    /// Checks `value`, bound to the slot called `name`.
    fn evaluate(&self, name: &str, value: &Value) -> Result<(), ConstraintViolation>;

    /// Description paragraph for help renderers.
    fn description(&self) -> String;
}
