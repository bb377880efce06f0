use super::{Constraint, ConstraintViolation};
use crate::value::{Value, ValueType};

/// Bounds on the number of characters of a string value, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthConstraint {
    min: usize,
    max: usize,
}

impl LengthConstraint {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: usize) -> Self {
        Self::new(min, usize::MAX)
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Constraint for LengthConstraint {
    fn type_check(&self, ty: ValueType) -> bool {
        ty == ValueType::String
    }

    fn evaluate(&self, name: &str, value: &Value) -> Result<(), ConstraintViolation> {
        let len = value.as_str().map(|s| s.chars().count());
        match len {
            Some(n) if n >= self.min && n <= self.max => Ok(()),
            _ => Err(ConstraintViolation::new(
                name,
                format!(
                    "value '{}' of {} must have {}",
                    value,
                    name,
                    self.description()
                ),
            )),
        }
    }

    fn description(&self) -> String {
        if self.max == usize::MAX {
            format!("length [{}...]", self.min)
        } else {
            format!("length [{}...{}]", self.min, self.max)
        }
    }
}
