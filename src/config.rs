//! Grammar documents: a whole grammar declared in YAML or JSON.
//!
//! A document is only a description. [`GrammarDocument::build`] feeds it through
//! [`GrammarBuilder`], so a document is subject to exactly the same registration
//! invariants as a grammar declared in code.
//!
//! ```yaml
//! name: signal
//! version: "1.0"
//! options:
//!   - name: a
//!     description: Action label
//!     argument: { name: LABEL, type: string, constraints: [ { length: { min: 3, max: 6 } } ] }
//! arguments:
//!   - { name: PID, type: integer, description: Process id, constraints: [ { range: "[-2...150]" } ] }
//!   - name: TYPE
//!     type: integer
//!     description: Signal type
//!     default: "4"
//!     constraints: [ { enumeration: { values: [2, 3, 4] } } ]
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::Command;
use crate::constraint::{EnumerationConstraint, LengthConstraint, NumericRange, RangeConstraint};
use crate::registry::{Grammar, GrammarBuilder};
use crate::slot::{ArgumentSlot, OptionSlot};
use crate::value::{Value, ValueType};
use crate::{err_msg, GrammarError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDocument {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionDocument>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDocument>,
    #[serde(default)]
    pub commands: Vec<CommandDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionDocument {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub argument: Option<ArgumentDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Declared optional without a default; registration rejects this unless `default` is set.
    #[serde(default)]
    pub optional: bool,
    /// Serialized default; implies `optional`.
    #[serde(default)]
    pub default: Option<Scalar>,
    /// Written as single-key maps, e.g. `{ range: "[-3...6]" }`, in both formats.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub constraints: Vec<ConstraintDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDocument {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub options: Vec<OptionDocument>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ConstraintDocument {
    Length {
        #[serde(default)]
        min: usize,
        #[serde(default)]
        max: Option<usize>,
    },
    /// Range notation, e.g. `"[-2...150]"`.
    Range(String),
    Enumeration {
        #[serde(default)]
        values: Vec<Scalar>,
        #[serde(default)]
        ranges: Vec<RangeDocument>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeDocument {
    pub include: String,
    #[serde(default)]
    pub exclude: Option<String>,
}

/// A literal as written in the document; re-parsed with the slot's declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

impl GrammarDocument {
    pub fn from_yaml_str(text: &str) -> Result<Self, GrammarError> {
        serde_yaml::from_str(text)
            .map_err(|e| err_msg!(Configuration, "invalid grammar document: {}", e).with_source(e))
    }

    pub fn from_json_str(text: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(text)
            .map_err(|e| err_msg!(Configuration, "invalid grammar document: {}", e).with_source(e))
    }

    /// Reads a document, choosing the format by extension (`.json`, otherwise YAML).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Io, "cannot read grammar document {}: {}", path.display(), e).with_source(e)
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), json = is_json, "loading grammar document");
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Registers every declaration and freezes the grammar.
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        let mut builder = GrammarBuilder::new(&self.name);
        if let Some(version) = &self.version {
            builder.version(version);
        }
        for option in &self.options {
            builder.register_global_option(option.to_slot()?)?;
        }
        for argument in &self.arguments {
            builder.register_global_argument(argument.to_slot()?)?;
        }
        for command in &self.commands {
            builder.register_command(command.to_command()?)?;
        }
        builder.build()
    }
}

impl OptionDocument {
    fn to_slot(&self) -> Result<OptionSlot, GrammarError> {
        let mut slot = OptionSlot::new(&self.name, &self.description);
        if let Some(id) = &self.id {
            slot = slot.id(id);
        }
        for alt in &self.alternatives {
            slot = slot.alternative(alt);
        }
        if self.multiple {
            slot = slot.multiple();
        }
        if self.required {
            slot = slot.required();
        }
        if let Some(argument) = &self.argument {
            slot = slot.argument(argument.to_slot_described(&self.description)?);
        }
        Ok(slot)
    }
}

impl ArgumentDocument {
    fn to_slot(&self) -> Result<ArgumentSlot, GrammarError> {
        self.to_slot_described("")
    }

    /// Option values may leave out their description and inherit the option's.
    fn to_slot_described(&self, fallback: &str) -> Result<ArgumentSlot, GrammarError> {
        let description = self.description.as_deref().unwrap_or(fallback);
        let mut slot = ArgumentSlot::new(&self.name, self.value_type, description);
        if let Some(id) = &self.id {
            slot = slot.id(id);
        }
        for alt in &self.alternatives {
            slot = slot.alternative(alt);
        }
        for constraint in &self.constraints {
            slot = constraint.attach(slot, &self.name, self.value_type)?;
        }
        if self.optional {
            slot = slot.optional();
        }
        if let Some(default) = &self.default {
            slot = slot.default_value(default.to_string());
        }
        Ok(slot)
    }
}

impl CommandDocument {
    fn to_command(&self) -> Result<Command, GrammarError> {
        let mut command = Command::new(&self.name, &self.description);
        if let Some(id) = &self.id {
            command = command.id(id);
        }
        for alt in &self.alternatives {
            command = command.alternative(alt);
        }
        for option in &self.options {
            command = command.option(option.to_slot()?);
        }
        for argument in &self.arguments {
            command = command.argument(argument.to_slot()?);
        }
        Ok(command)
    }
}

impl ConstraintDocument {
    fn attach(&self, slot: ArgumentSlot, name: &str, ty: ValueType) -> Result<ArgumentSlot, GrammarError> {
        Ok(match self {
            ConstraintDocument::Length { min, max } => {
                slot.constraint(LengthConstraint::new(*min, max.unwrap_or(usize::MAX)))
            }
            ConstraintDocument::Range(notation) => {
                slot.constraint(RangeConstraint::new(notation.parse::<NumericRange>()?))
            }
            ConstraintDocument::Enumeration { values, ranges } => {
                let mut enumeration = EnumerationConstraint::new();
                for scalar in values {
                    enumeration = enumeration.value(typed_value(scalar, name, ty)?);
                }
                for range in ranges {
                    let include = range.include.parse::<NumericRange>()?;
                    enumeration = match &range.exclude {
                        Some(exclude) => enumeration.include_except(include, exclude.parse()?),
                        None => enumeration.include(include),
                    };
                }
                slot.constraint(enumeration)
            }
        })
    }
}

fn typed_value(scalar: &Scalar, slot: &str, ty: ValueType) -> Result<Value, GrammarError> {
    let text = scalar.to_string();
    ty.parse(&text).ok_or_else(|| {
        err_msg!(
            Configuration,
            "enumeration value '{}' of '{}' is not a valid {}",
            text,
            slot,
            ty
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraints_are_single_key_maps() {
        let yaml = r#"
name: t
arguments:
  - name: N
    type: integer
    description: n
    constraints:
      - { range: "[-3...6]" }
      - { enumeration: { values: [1, 2], ranges: [ { include: "[0...9]", exclude: "[4...5]" } ] } }
  - { name: S, description: s, constraints: [ { length: { min: 1, max: 3 } } ] }
"#;
        let doc = GrammarDocument::from_yaml_str(yaml).unwrap();
        assert_eq!(doc.arguments[0].constraints[0], ConstraintDocument::Range("[-3...6]".into()));
        assert_eq!(
            doc.arguments[0].constraints[1],
            ConstraintDocument::Enumeration {
                values: vec![Scalar::Integer(1), Scalar::Integer(2)],
                ranges: vec![RangeDocument {
                    include: "[0...9]".into(),
                    exclude: Some("[4...5]".into()),
                }],
            }
        );
        assert_eq!(doc.arguments[1].constraints[0], ConstraintDocument::Length { min: 1, max: Some(3) });
        assert!(doc.build().is_ok());
    }

    #[test]
    fn test_json_uses_the_same_constraint_shape() {
        let json = r#"{ "name": "t", "arguments": [
            { "name": "N", "type": "integer", "description": "n", "constraints": [ { "range": "(0...10)" } ] }
        ] }"#;
        let doc = GrammarDocument::from_json_str(json).unwrap();
        assert_eq!(doc.arguments[0].constraints, vec![ConstraintDocument::Range("(0...10)".into())]);
    }

    #[test]
    fn test_constraint_tag_must_be_known() {
        let yaml = "name: t\narguments:\n  - { name: N, description: n, constraints: [ { between: \"[0...1]\" } ] }\n";
        let err = GrammarDocument::from_yaml_str(yaml).unwrap_err();
        assert_eq!(err.error_type(), crate::ErrorType::Configuration);
    }
}
