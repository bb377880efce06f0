//! The matching engine.
//!
//! - [`dispatcher`] drives a parse through global options, arguments or a command, and the
//!   selected command's own scope.
//! - [`options`] recognizes option tokens and binds their values.
//! - [`positional`] binds runs of positional tokens, splicing in defaults.
//! - [`context`] holds the state a single parse accumulates.
//!
//! Nothing here mutates the grammar, so one grammar can serve concurrent parses.

mod context;
mod dispatcher;
mod options;
mod positional;

pub(crate) use dispatcher::dispatch;
