//! Commands: named scopes with their own options and arguments.
//!
//! A [`Command`] is declared with a fluent builder and validated when it is handed to
//! [`GrammarBuilder::register_command`](crate::GrammarBuilder::register_command), which
//! turns it into a frozen [`RegisteredCommand`].

use std::fmt;
use std::sync::Arc;

use crate::diagnostics::BoxedError;
use crate::registry::Scope;
use crate::result::{CommandResult, ScopeResult};
use crate::slot::{ArgumentSlot, OptionSlot, SlotInfo};
use crate::GrammarError;

/// Callback run after a successful parse selected its command.
pub type Executor = Arc<dyn Fn(&Invocation<'_>) -> Result<(), BoxedError> + Send + Sync>;

/// What an executor sees: its own bindings, and the global options read-only.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub globals: &'a ScopeResult,
    pub command: &'a CommandResult,
}

/// Declaration of a command, before registration.
#[derive(Clone)]
pub struct Command {
    info: SlotInfo,
    options: Vec<OptionSlot>,
    arguments: Vec<ArgumentSlot>,
    executor: Option<Executor>,
}

impl Command {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            info: SlotInfo::new(name, description),
            options: Vec::new(),
            arguments: Vec::new(),
            executor: None,
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

    pub fn option(mut self, option: OptionSlot) -> Self {
        self.options.push(option);
        self
    }

    pub fn argument(mut self, argument: ArgumentSlot) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn executor<F>(mut self, executor: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<(), BoxedError> + Send + Sync + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// Validates the declaration and registers its slots into a fresh scope.
    pub(crate) fn register(self) -> Result<RegisteredCommand, GrammarError> {
        self.info.validate("command")?;
        let mut scope = Scope::new(Some(self.info.name().to_string()));
        for option in self.options {
            scope.register_option(option)?;
        }
        for argument in self.arguments {
            scope.register_argument(argument)?;
        }
        Ok(RegisteredCommand {
            info: self.info,
            scope,
            executor: self.executor,
        })
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("info", &self.info)
            .field("options", &self.options)
            .field("arguments", &self.arguments)
            .field("executor", &self.executor.is_some())
            .finish()
    }
}

/// A validated command, part of a frozen grammar.
#[derive(Clone)]
pub struct RegisteredCommand {
    info: SlotInfo,
    scope: Scope,
    executor: Option<Executor>,
}

impl RegisteredCommand {
    pub fn info(&self) -> &SlotInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn id(&self) -> &str {
        self.info.id()
    }

    /// The one-line description.
    pub fn description(&self) -> &str {
        self.info.description()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub(crate) fn executor(&self) -> Option<&Executor> {
        self.executor.as_ref()
    }
}

impl fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("info", &self.info)
            .field("scope", &self.scope)
            .field("executor", &self.executor.is_some())
            .finish()
    }
}
