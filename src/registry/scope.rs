use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::slot::{ArgumentSlot, OptionSlot};
use crate::{err_msg, GrammarError};

/// Any name (canonical or alternative) to canonical name, per slot kind.
///
/// Shared with parse results so lookups by alternative name work without the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NameIndex {
    pub(crate) options: HashMap<String, String>,
    pub(crate) arguments: HashMap<String, String>,
}

impl NameIndex {
    pub(crate) fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub(crate) fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).map(String::as_str)
    }
}

/// The option and argument slots valid at the top level or inside one command.
///
/// Options keep their registration order. Arguments are ordered positionally; either at
/// most one of them is optional, or all optional ones are trailing.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    command: Option<String>,
    options: Vec<OptionSlot>,
    option_index: HashMap<String, usize>,
    arguments: Vec<ArgumentSlot>,
    argument_index: HashMap<String, usize>,
    names: Arc<NameIndex>,
    mandatory: usize,
    optional: usize,
}

impl Scope {
    /// A new, empty scope; `command` is the owning command's name, `None` at top level.
    pub(crate) fn new(command: Option<String>) -> Self {
        Self {
            command,
            ..Self::default()
        }
    }

    /// Name of the owning command, `None` for the global scope.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn options(&self) -> &[OptionSlot] {
        &self.options
    }

    pub fn arguments(&self) -> &[ArgumentSlot] {
        &self.arguments
    }

    pub fn mandatory_count(&self) -> usize {
        self.mandatory
    }

    pub fn optional_count(&self) -> usize {
        self.optional
    }

    pub fn max_arguments(&self) -> usize {
        self.mandatory + self.optional
    }

    /// Looks an option up by canonical or alternative name.
    pub fn option(&self, name: &str) -> Option<&OptionSlot> {
        self.option_index.get(name).map(|&i| &self.options[i])
    }

    /// Looks an argument up by canonical or alternative name.
    pub fn argument(&self, name: &str) -> Option<&ArgumentSlot> {
        self.argument_index.get(name).map(|&i| &self.arguments[i])
    }

    /// Resolves a command-line token (`-x`, `--name`) to the option it spells.
    pub fn resolve_flag(&self, token: &str) -> Option<(usize, &OptionSlot)> {
        let name = match token.strip_prefix("--") {
            Some(long) if long.chars().count() > 1 => long,
            Some(_) => return None,
            None => match token.strip_prefix('-') {
                Some(short) if short.chars().count() == 1 => short,
                _ => return None,
            },
        };
        self.option_index.get(name).map(|&i| (i, &self.options[i]))
    }

    pub(crate) fn names(&self) -> &Arc<NameIndex> {
        &self.names
    }

    /// What to call this scope in messages.
    pub(crate) fn describe(&self) -> String {
        match &self.command {
            Some(name) => format!("command '{}'", name),
            None => "global scope".to_string(),
        }
    }

    pub(crate) fn register_option(&mut self, option: OptionSlot) -> Result<(), GrammarError> {
        option.validate()?;
        for name in option.info().all_names() {
            if self.option_index.contains_key(name) {
                return Err(err_msg!(
                    Configuration,
                    "option name '{}' is already registered in {}",
                    name,
                    self.describe()
                ));
            }
        }
        let index = self.options.len();
        let canonical = option.name().to_string();
        let names = Arc::make_mut(&mut self.names);
        for name in option.info().all_names() {
            self.option_index.insert(name.to_string(), index);
            names.options.insert(name.to_string(), canonical.clone());
        }
        debug!(option = %option.flag(), scope = %self.describe(), "registered option");
        self.options.push(option);
        Ok(())
    }

    pub(crate) fn register_argument(&mut self, argument: ArgumentSlot) -> Result<(), GrammarError> {
        argument.validate("argument")?;
        for name in argument.info().all_names() {
            if self.argument_index.contains_key(name) {
                return Err(err_msg!(
                    Configuration,
                    "argument name '{}' is already registered in {}",
                    name,
                    self.describe()
                ));
            }
        }
        self.check_placement(&argument)?;

        let index = self.arguments.len();
        let canonical = argument.name().to_string();
        let names = Arc::make_mut(&mut self.names);
        for name in argument.info().all_names() {
            self.argument_index.insert(name.to_string(), index);
            names.arguments.insert(name.to_string(), canonical.clone());
        }
        if argument.is_optional() {
            self.optional += 1;
        } else {
            self.mandatory += 1;
        }
        debug!(
            argument = %argument.name(),
            optional = argument.is_optional(),
            scope = %self.describe(),
            "registered argument"
        );
        self.arguments.push(argument);
        Ok(())
    }

    /// One optional argument may sit anywhere; several must all be trailing.
    fn check_placement(&self, argument: &ArgumentSlot) -> Result<(), GrammarError> {
        let first_optional = self.arguments.iter().position(ArgumentSlot::is_optional);
        let Some(first) = first_optional else {
            return Ok(());
        };
        let mandatory_after_optional = self.arguments[first..].iter().any(|a| !a.is_optional());
        let misplaced = if argument.is_optional() {
            mandatory_after_optional
        } else {
            self.optional >= 2
        };
        if misplaced {
            return Err(err_msg!(
                Configuration,
                "argument '{}' cannot be registered in {}: with more than one optional argument all optional arguments must be trailing (first optional is '{}')",
                argument.name(),
                self.describe(),
                self.arguments[first].name()
            ));
        }
        Ok(())
    }
}
