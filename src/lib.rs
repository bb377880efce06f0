//! # vyakarana
//!
//! A declarative command-line grammar engine. Programs register global options, then
//! either positional arguments or commands (each with options and arguments of its own),
//! with typed slots, constraints, and defaults. The engine matches a token vector against
//! that grammar and returns a typed result tree or a classified [`GrammarError`].
//!
//! ```rust
//! use vyakarana::{ArgumentSlot, EnumerationConstraint, Grammar, OptionSlot, RangeConstraint, Value};
//!
//! let mut builder = Grammar::builder("signal");
//! builder
//!     .register_global_option(
//!         OptionSlot::new("b", "Base priority")
//!             .argument(ArgumentSlot::integer("BASE", "Base").constraint(RangeConstraint::inclusive(-3, 6))),
//!     )?
//!     .register_global_argument(ArgumentSlot::integer("PID", "Process id"))?
//!     .register_global_argument(
//!         ArgumentSlot::integer("TYPE", "Signal type")
//!             .constraint(EnumerationConstraint::of([2i64, 3, 4]))
//!             .default_value("4"),
//!     )?
//!     .register_global_argument(ArgumentSlot::string("LEVEL", "Level"))?;
//! let grammar = builder.build()?;
//!
//! let result = grammar.parse(&["-b", "-2", "123", "level"])?;
//! assert_eq!(result.option_value("b"), Some(&Value::Integer(-2)));
//! assert_eq!(result.argument_value("TYPE"), Some(&Value::Integer(4)));
//! # Ok::<(), vyakarana::GrammarError>(())
//! ```

pub use crate::diagnostics::{ErrorContext, ErrorType, GrammarError, Span};

pub mod cli;
pub mod command;
pub mod config;
pub mod constraint;
pub mod diagnostics;
mod matching;
pub mod registry;
pub mod result;
pub mod slot;
pub mod syntax;
pub mod value;

pub use command::{Command, Executor, Invocation, RegisteredCommand};
pub use config::GrammarDocument;
pub use constraint::{
    Constraint, ConstraintViolation, EnumerationConstraint, LengthConstraint, NumericRange,
    RangeConstraint,
};
pub use registry::{Grammar, GrammarBuilder, Scope};
pub use result::{
    Binding, BindingKind, BoundArgument, BoundOption, BoundValue, CommandResult, ParseResult,
    Provenance, ScopeResult,
};
pub use slot::{ArgumentSlot, OptionSlot, SlotInfo};
pub use value::{Number, Value, ValueType};
