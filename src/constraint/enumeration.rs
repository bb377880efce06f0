use super::{Constraint, ConstraintViolation, NumericRange};
use crate::value::{Value, ValueType};

/// Accepted set made of explicit values and numeric ranges with holes.
///
/// A value is accepted when it equals one of the explicit values, or when it lies inside
/// some included range and outside every excluded part. An excluded part removes values
/// from all included ranges, not just the one it was declared with. An explicit value
/// that falls inside an excluded part is still accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumerationConstraint {
    values: Vec<Value>,
    ranges: Vec<(NumericRange, Option<NumericRange>)>,
}

impl EnumerationConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            ranges: Vec::new(),
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn include(mut self, range: NumericRange) -> Self {
        self.ranges.push((range, None));
        self
    }

    pub fn include_except(mut self, range: NumericRange, excluded: NumericRange) -> Self {
        self.ranges.push((range, Some(excluded)));
        self
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn ranges(&self) -> &[(NumericRange, Option<NumericRange>)] {
        &self.ranges
    }

    fn accepts(&self, value: &Value) -> bool {
        if self.values.iter().any(|v| v.matches(value)) {
            return true;
        }
        let Some(x) = value.as_number() else {
            return false;
        };
        let included = self.ranges.iter().any(|(range, _)| range.contains(x));
        let excluded = self
            .ranges
            .iter()
            .filter_map(|(_, excluded)| excluded.as_ref())
            .any(|range| range.contains(x));
        included && !excluded
    }
}

impl Constraint for EnumerationConstraint {
    fn type_check(&self, ty: ValueType) -> bool {
        if self.values.is_empty() && self.ranges.is_empty() {
            return false;
        }
        if !self.ranges.is_empty() && !ty.is_numeric() {
            return false;
        }
        self.values.iter().all(|v| match (v.value_type(), ty) {
            (ValueType::Integer, ValueType::Float) => true,
            (actual, declared) => actual == declared,
        })
    }

    fn evaluate(&self, name: &str, value: &Value) -> Result<(), ConstraintViolation> {
        if self.accepts(value) {
            return Ok(());
        }
        Err(ConstraintViolation::new(
            name,
            format!(
                "value {} of {} is not in the accepted set {}",
                value,
                name,
                self.description()
            ),
        ))
    }

    fn description(&self) -> String {
        let mut parts = Vec::new();
        if !self.values.is_empty() {
            let listed: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
            parts.push(format!("{{{}}}", listed.join(", ")));
        }
        for (included, excluded) in &self.ranges {
            match excluded {
                Some(e) => parts.push(format!("[{}] ![{}]", included, e)),
                None => parts.push(format!("[{}]", included)),
            }
        }
        parts.join(" ")
    }
}
