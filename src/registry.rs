//! Definition registry: the grammar a program declares at startup.
//!
//! ## Usage Workflow
//! ```rust
//! use vyakarana::{ArgumentSlot, Grammar, OptionSlot};
//! // 1. Register global options and either arguments or commands
//! let mut builder = Grammar::builder("kill");
//! builder
//!     .register_global_option(OptionSlot::new("v", "Print what is being done"))?
//!     .register_global_argument(ArgumentSlot::integer("PID", "Process to signal"))?;
//! // 2. Freeze it
//! let grammar = builder.build()?;
//! // 3. Parse as often as needed, from any thread
//! let result = grammar.parse(&["-v", "42"])?;
//! assert!(result.has_option("v"));
//! # Ok::<(), vyakarana::GrammarError>(())
//! ```
//!
//! ## Registry Invariants
//! - Every registration validates its slot immediately and fails with a
//!   [`GrammarError::Configuration`] on the first problem.
//! - The global scope carries positional arguments or commands, never both.
//! - A built [`Grammar`] is never mutated; all per-parse state lives in the matcher.
//!

mod scope;

use std::collections::HashMap;

use tracing::debug;

use crate::command::{Command, Invocation, RegisteredCommand};
use crate::matching;
use crate::result::ParseResult;
use crate::slot::{ArgumentSlot, OptionSlot};
use crate::syntax::TokenStream;
use crate::{err_msg, GrammarError};

pub(crate) use scope::NameIndex;
pub use scope::Scope;

// ============================================================================
// BUILDER
// ============================================================================

/// Mutable registration phase of a [`Grammar`].
#[derive(Debug)]
pub struct GrammarBuilder {
    name: String,
    version: Option<String>,
    globals: Scope,
    commands: Vec<RegisteredCommand>,
    command_index: HashMap<String, usize>,
}

impl GrammarBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            globals: Scope::new(None),
            commands: Vec::new(),
            command_index: HashMap::new(),
        }
    }

    pub fn version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = Some(version.into());
        self
    }

    pub fn register_global_option(&mut self, option: OptionSlot) -> Result<&mut Self, GrammarError> {
        self.globals.register_option(option)?;
        Ok(self)
    }

    /// Registers a positional argument of the global scope.
    ///
    /// # Errors
    /// Fails if commands are registered, if the slot is invalid or its name is taken, or if
    /// it would break the optional-argument placement rule.
    pub fn register_global_argument(&mut self, argument: ArgumentSlot) -> Result<&mut Self, GrammarError> {
        if let Some(command) = self.commands.first() {
            return Err(err_msg!(
                Configuration,
                "argument '{}' cannot be registered: the grammar uses commands (e.g. '{}'), global arguments and commands are exclusive",
                argument.name(),
                command.name()
            ));
        }
        self.globals.register_argument(argument)?;
        Ok(self)
    }

    /// Registers a command together with its own options and arguments.
    ///
    /// # Errors
    /// Fails if global arguments are registered, if the command or any of its slots is
    /// invalid, or if one of its names is taken by another command.
    pub fn register_command(&mut self, command: Command) -> Result<&mut Self, GrammarError> {
        if let Some(argument) = self.globals.arguments().first() {
            return Err(err_msg!(
                Configuration,
                "command '{}' cannot be registered: the grammar has global arguments (e.g. '{}'), global arguments and commands are exclusive",
                command.name(),
                argument.name()
            ));
        }
        let command = command.register()?;
        for name in command.info().all_names() {
            if self.command_index.contains_key(name) {
                return Err(err_msg!(Configuration, "command name '{}' is already registered", name));
            }
        }
        let index = self.commands.len();
        for name in command.info().all_names() {
            self.command_index.insert(name.to_string(), index);
        }
        debug!(command = %command.name(), "registered command");
        self.commands.push(command);
        Ok(self)
    }

    /// Freezes the registry.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if self.name.trim().is_empty() {
            return Err(err_msg!(Configuration, "the grammar needs a program name"));
        }
        debug!(
            grammar = %self.name,
            options = self.globals.options().len(),
            arguments = self.globals.arguments().len(),
            commands = self.commands.len(),
            "grammar frozen"
        );
        Ok(Grammar {
            name: self.name,
            version: self.version,
            globals: self.globals,
            commands: self.commands,
            command_index: self.command_index,
        })
    }
}

// ============================================================================
// FROZEN GRAMMAR
// ============================================================================

/// A frozen grammar. Safe to share across threads; every parse allocates its own state.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    version: Option<String>,
    globals: Scope,
    commands: Vec<RegisteredCommand>,
    command_index: HashMap<String, usize>,
}

impl Grammar {
    pub fn builder(name: impl Into<String>) -> GrammarBuilder {
        GrammarBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn globals(&self) -> &Scope {
        &self.globals
    }

    /// Commands in registration order.
    pub fn commands(&self) -> &[RegisteredCommand] {
        &self.commands
    }

    pub fn uses_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Resolves a command by canonical or alternative name.
    pub fn command(&self, name: &str) -> Option<&RegisteredCommand> {
        self.command_index.get(name).map(|&i| &self.commands[i])
    }

    /// Matches `tokens` against the grammar.
    ///
    /// The first failure aborts the parse and is returned; nothing is kept between calls.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParseResult, GrammarError> {
        let stream = TokenStream::new(tokens);
        matching::dispatch(self, stream)
    }

    /// Parses `tokens`, then hands the result to the selected command's executor.
    pub fn run<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParseResult, GrammarError> {
        let result = self.parse(tokens)?;
        if let Some(selected) = result.command() {
            let executor = self.command(selected.name()).and_then(RegisteredCommand::executor);
            if let Some(executor) = executor {
                debug!(command = %selected.name(), "running executor");
                let invocation = Invocation {
                    globals: result.globals(),
                    command: selected,
                };
                executor(&invocation).map_err(|e| {
                    err_msg!(Execution, "command '{}' failed: {}", selected.name(), e).with_source(e)
                })?;
            }
        }
        Ok(result)
    }
}
