//! Slot definitions: options and positional arguments.
//!
//! Slots are plain builders until they are registered. Registration validates them (see
//! [`ArgumentSlot::validate`]) and from then on they are never mutated.
//!
//! ## Naming
//!
//! Names and alternative names match `^[A-Za-z][A-Za-z0-9_-]*$`. An option named with a
//! single character is written `-x` on the command line, longer names are written
//! `--name`. The id defaults to the name and is what binders see.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::constraint::Constraint;
use crate::value::{Value, ValueType};
use crate::{err_msg, GrammarError};

static SLOT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap());

/// Whether `name` is acceptable as a slot, alternative, or command name.
pub fn is_valid_name(name: &str) -> bool {
    SLOT_NAME.is_match(name)
}

/// The command-line spelling of an option name.
pub fn flag_token(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{}", name)
    } else {
        format!("--{}", name)
    }
}

// ============================================================================
// SHARED IDENTITY
// ============================================================================

/// Name, id, alternatives, and description shared by every kind of slot and by commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    name: String,
    id: Option<String>,
    alternatives: Vec<String>,
    description: String,
}

impl SlotInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            alternatives: Vec::new(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical id, the name unless set explicitly.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Canonical name followed by the alternatives.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    pub(crate) fn push_alternative(&mut self, name: String) {
        self.alternatives.push(name);
    }

    /// Checks the naming rules. `kind` is used in messages ("option", "argument", ...).
    pub(crate) fn validate(&self, kind: &str) -> Result<(), GrammarError> {
        if !is_valid_name(&self.name) {
            return Err(err_msg!(
                Configuration,
                "{} name '{}' must match ^[A-Za-z][A-Za-z0-9_-]*$",
                kind,
                self.name
            ));
        }
        if let Some(id) = &self.id {
            if id.trim().is_empty() {
                return Err(err_msg!(Configuration, "{} '{}' has an empty id", kind, self.name));
            }
        }
        if self.description.trim().is_empty() {
            return Err(err_msg!(
                Configuration,
                "{} '{}' has no description",
                kind,
                self.name
            ));
        }
        for (i, alt) in self.alternatives.iter().enumerate() {
            if !is_valid_name(alt) {
                return Err(err_msg!(
                    Configuration,
                    "alternative name '{}' of {} '{}' must match ^[A-Za-z][A-Za-z0-9_-]*$",
                    alt,
                    kind,
                    self.name
                ));
            }
            if alt == &self.name || self.alternatives[..i].contains(alt) {
                return Err(err_msg!(
                    Configuration,
                    "alternative name '{}' of {} '{}' is declared twice",
                    alt,
                    kind,
                    self.name
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// ARGUMENT SLOTS
// ============================================================================

/// A typed value slot: a positional argument, or the value of an option.
#[derive(Clone)]
pub struct ArgumentSlot {
    info: SlotInfo,
    value_type: ValueType,
    constraints: Vec<Arc<dyn Constraint>>,
    optional: bool,
    default_text: Option<String>,
}

impl ArgumentSlot {
    pub fn new(name: impl Into<String>, value_type: ValueType, description: impl Into<String>) -> Self {
        Self {
            info: SlotInfo::new(name, description),
            value_type,
            constraints: Vec::new(),
            optional: false,
            default_text: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ValueType::String, description)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ValueType::Integer, description)
    }

    pub fn float(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ValueType::Float, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ValueType::Boolean, description)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.info.set_id(id.into());
        self
    }

    pub fn alternative(mut self, name: impl Into<String>) -> Self {
        self.info.push_alternative(name.into());
        self
    }

    pub fn constraint(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Marks the slot optional. An optional slot needs a default, see [`Self::default_value`].
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the slot optional with `text` as its serialized default.
    pub fn default_value(mut self, text: impl Into<String>) -> Self {
        self.optional = true;
        self.default_text = Some(text.into());
        self
    }

    pub fn info(&self) -> &SlotInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn constraints(&self) -> &[Arc<dyn Constraint>] {
        &self.constraints
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The serialized default, as declared.
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    /// Runs every constraint over `value`, stopping at the first violation.
    pub fn check(&self, value: &Value) -> Result<(), crate::constraint::ConstraintViolation> {
        self.constraints
            .iter()
            .try_for_each(|c| c.evaluate(self.name(), value))
    }

    /// Registration-time validation: naming, constraint types, and the default value.
    ///
    /// `kind` names the slot in messages, e.g. "argument" or "argument of option -a".
    pub(crate) fn validate(&self, kind: &str) -> Result<(), GrammarError> {
        self.info.validate(kind)?;
        for constraint in &self.constraints {
            if !constraint.type_check(self.value_type) {
                return Err(err_msg!(
                    Configuration,
                    "constraint {} cannot be attached to {} '{}' of type {}",
                    constraint.description(),
                    kind,
                    self.name(),
                    self.value_type
                ));
            }
        }
        match (self.optional, &self.default_text) {
            (true, None) => {
                return Err(err_msg!(
                    Configuration,
                    "optional {} '{}' has no default value",
                    kind,
                    self.name()
                ));
            }
            (true, Some(text)) => {
                let value = self.value_type.parse(text).ok_or_else(|| {
                    err_msg!(
                        Configuration,
                        "default value '{}' of {} '{}' is not a valid {}",
                        text,
                        kind,
                        self.name(),
                        self.value_type
                    )
                })?;
                self.check(&value).map_err(|violation| {
                    err_msg!(
                        Configuration,
                        "default value of {} '{}' is rejected by its own constraints: {}",
                        kind,
                        self.name(),
                        violation
                    )
                })?;
                trace!(slot = self.name(), default = %value, "validated default value");
            }
            (false, Some(_)) => {
                return Err(err_msg!(
                    Configuration,
                    "mandatory {} '{}' declares a default value",
                    kind,
                    self.name()
                ));
            }
            (false, None) => {}
        }
        Ok(())
    }
}

impl fmt::Debug for ArgumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSlot")
            .field("name", &self.info.name())
            .field("type", &self.value_type)
            .field("optional", &self.optional)
            .field("default", &self.default_text)
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

// ============================================================================
// OPTION SLOTS
// ============================================================================

/// A named option, optionally carrying an argument slot for its value.
#[derive(Debug, Clone)]
pub struct OptionSlot {
    info: SlotInfo,
    argument: Option<ArgumentSlot>,
    multiple: bool,
    required: bool,
}

impl OptionSlot {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            info: SlotInfo::new(name, description),
            argument: None,
            multiple: false,
            required: false,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.info.set_id(id.into());
        self
    }

    pub fn alternative(mut self, name: impl Into<String>) -> Self {
        self.info.push_alternative(name.into());
        self
    }

    /// Attaches the slot that receives the option's value.
    pub fn argument(mut self, argument: ArgumentSlot) -> Self {
        self.argument = Some(argument);
        self
    }

    /// Allows the option to occur more than once.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Makes the option mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn info(&self) -> &SlotInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn value(&self) -> Option<&ArgumentSlot> {
        self.argument.as_ref()
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The canonical flag, e.g. `-a` or `--level`.
    pub fn flag(&self) -> String {
        flag_token(self.name())
    }

    /// Every spelling that selects this option.
    pub fn flags(&self) -> impl Iterator<Item = String> + '_ {
        self.info.all_names().map(flag_token)
    }

    pub(crate) fn validate(&self) -> Result<(), GrammarError> {
        self.info.validate("option")?;
        let kind = format!("argument of option {}", self.flag());
        if let Some(argument) = &self.argument {
            argument.validate(&kind)?;
        }
        Ok(())
    }
}
