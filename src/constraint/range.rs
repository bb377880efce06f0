use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Constraint, ConstraintViolation};
use crate::value::{Number, Value, ValueType};
use crate::{err_msg, GrammarError};

static RANGE_NOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([\[(])\s*([-+]?[0-9]+(?:\.[0-9]+)?)\s*\.\.\.\s*([-+]?[0-9]+(?:\.[0-9]+)?)\s*([\])])\s*$")
        .unwrap()
});

/// A numeric interval whose ends are independently inclusive or exclusive.
///
/// Written `[a...b]` (inclusive), `(a...b)` (exclusive), or mixed, e.g. `[0...10)`.
/// Bounds written without a fraction are kept as integers and compared exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub lower: Number,
    pub upper: Number,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl NumericRange {
    pub fn inclusive(lower: impl Into<Number>, upper: impl Into<Number>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    pub fn exclusive(lower: impl Into<Number>, upper: impl Into<Number>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            lower_inclusive: false,
            upper_inclusive: false,
        }
    }

    pub fn contains(&self, x: impl Into<Number>) -> bool {
        let x = x.into();
        let above = match x.partial_cmp(&self.lower) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.lower_inclusive,
            _ => false,
        };
        let below = match x.partial_cmp(&self.upper) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.upper_inclusive,
            _ => false,
        };
        above && below
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}...{}{}",
            if self.lower_inclusive { '[' } else { '(' },
            self.lower,
            self.upper,
            if self.upper_inclusive { ']' } else { ')' }
        )
    }
}

impl FromStr for NumericRange {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RANGE_NOTATION
            .captures(s)
            .ok_or_else(|| err_msg!(Configuration, "'{}' is not a range, expected e.g. [0...10)", s))?;
        let bound = |i: usize| -> Result<Number, GrammarError> {
            if let Ok(n) = caps[i].parse::<i64>() {
                return Ok(Number::Integer(n));
            }
            caps[i]
                .parse::<f64>()
                .map(Number::Float)
                .map_err(|e| err_msg!(Configuration, "bad range bound in '{}'", s).with_source(e))
        };
        let range = NumericRange {
            lower: bound(2)?,
            upper: bound(3)?,
            lower_inclusive: &caps[1] == "[",
            upper_inclusive: &caps[4] == "]",
        };
        if range.lower > range.upper {
            return Err(err_msg!(Configuration, "range '{}' has its lower bound above its upper bound", s));
        }
        Ok(range)
    }
}

/// Numeric bounds on integer or float slots.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeConstraint {
    range: NumericRange,
}

impl RangeConstraint {
    pub fn new(range: NumericRange) -> Self {
        Self { range }
    }

    /// Both ends inclusive, the usual `min..=max` bound.
    pub fn inclusive(min: impl Into<Number>, max: impl Into<Number>) -> Self {
        Self::new(NumericRange::inclusive(min, max))
    }

    pub fn range(&self) -> &NumericRange {
        &self.range
    }
}

impl Constraint for RangeConstraint {
    fn type_check(&self, ty: ValueType) -> bool {
        ty.is_numeric()
    }

    fn evaluate(&self, name: &str, value: &Value) -> Result<(), ConstraintViolation> {
        match value.as_number() {
            Some(x) if self.range.contains(x) => Ok(()),
            _ => Err(ConstraintViolation::new(
                name,
                format!("value {} of {} is out of range {}", value, name, self.range),
            )),
        }
    }

    fn description(&self) -> String {
        self.range.to_string()
    }
}
