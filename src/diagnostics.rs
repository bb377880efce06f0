//!
//! Unified, `miette`-based diagnostics for the grammar engine.
//!
//! # Overview
//!
//! Every failure the engine can produce is a [`GrammarError`]. Registration problems are
//! [`GrammarError::Configuration`] and indicate a bug in the program that declares the
//! grammar. Everything else is raised while matching a token vector and is recoverable by
//! the caller.
//!
//! # Error Construction Macros
//!
//! - **Use `err_msg!` for message-only errors.**
//!   - `err_msg!(Configuration, "option name '{}' is already registered", name)`
//!
//! - **Use `err_ctx!` when the offending token is known.**
//!   - `err_ctx!(IllegalArgument, message, stream.source(), token.span)`
//!   - `err_ctx!(IllegalArgument, message, stream.source(), token.span, help)`
//!
//! The source attached by `err_ctx!` is the command line the tokens were taken from, so a
//! rendered report points at the exact token that failed.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Byte range of a token inside the rendered command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Closed classification of [`GrammarError`] variants, used by callers and tests instead of
/// matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Malformed grammar declaration, raised during registration
    Configuration,
    /// Wrong argument count, type mismatch, unknown option, repeated option
    IllegalArgument,
    /// A value parsed fine but an attached constraint rejected it
    Constraint,
    /// No command given, or the token does not name one
    CommandNotFound,
    /// A command executor returned an error
    Execution,
    /// Reading a grammar document failed
    Io,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Configuration => "configuration",
            ErrorType::IllegalArgument => "illegal_argument",
            ErrorType::Constraint => "constraint",
            ErrorType::CommandNotFound => "command_not_found",
            ErrorType::Execution => "execution",
            ErrorType::Io => "io",
        }
    }

    /// Parse-time errors are recoverable; the others abort setup or report on the host.
    pub fn is_parse_time(&self) -> bool {
        matches!(
            self,
            ErrorType::IllegalArgument | ErrorType::Constraint | ErrorType::CommandNotFound
        )
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal error context: where on the command line, and how to help.
#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    pub source: Option<SourceArc>,
    pub span: Option<Span>,
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

/// Unified error type for every failure mode of the engine.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedError>,
    },
    #[error("Illegal command line argument: {message}")]
    IllegalArgument {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedError>,
    },
    #[error("Constraint violated: {message}")]
    Constraint {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedError>,
    },
    #[error("Command not found: {message}")]
    CommandNotFound {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedError>,
    },
    #[error("Command failed: {message}")]
    Execution {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedError>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedError>,
    },
}

impl GrammarError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            GrammarError::Configuration { ctx, .. }
            | GrammarError::IllegalArgument { ctx, .. }
            | GrammarError::Constraint { ctx, .. }
            | GrammarError::CommandNotFound { ctx, .. }
            | GrammarError::Execution { ctx, .. }
            | GrammarError::Io { ctx, .. } => ctx,
        }
    }

    /// The bare message, without the category prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            GrammarError::Configuration { message, .. }
            | GrammarError::IllegalArgument { message, .. }
            | GrammarError::Constraint { message, .. }
            | GrammarError::CommandNotFound { message, .. }
            | GrammarError::Execution { message, .. }
            | GrammarError::Io { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            GrammarError::Configuration { .. } => ErrorType::Configuration,
            GrammarError::IllegalArgument { .. } => ErrorType::IllegalArgument,
            GrammarError::Constraint { .. } => ErrorType::Constraint,
            GrammarError::CommandNotFound { .. } => ErrorType::CommandNotFound,
            GrammarError::Execution { .. } => ErrorType::Execution,
            GrammarError::Io { .. } => ErrorType::Io,
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.get_ctx().span
    }

    pub fn help_text(&self) -> Option<&str> {
        self.get_ctx().help.as_deref()
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, cause: impl Into<BoxedError>) -> Self {
        let slot = match &mut self {
            GrammarError::Configuration { source, .. }
            | GrammarError::IllegalArgument { source, .. }
            | GrammarError::Constraint { source, .. }
            | GrammarError::CommandNotFound { source, .. }
            | GrammarError::Execution { source, .. }
            | GrammarError::Io { source, .. } => source,
        };
        *slot = Some(cause.into());
        self
    }
}

impl Diagnostic for GrammarError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("vyakarana::{}", self.error_type())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        // A span without a source has nothing to point into.
        ctx.source.as_ref()?;
        let span = ctx.span?;
        let len = span.len().max(1);
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Wraps a rendered command line so diagnostics can point into it.
pub fn to_error_source<S: AsRef<str>>(source: S) -> SourceArc {
    Arc::new(NamedSource::new("command line", source.as_ref().to_string()))
}

/// Constructs a `GrammarError` variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $($arg:tt)+) => {
        $crate::GrammarError::$variant {
            message: format!($($arg)+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a `GrammarError` variant pointing at a token of the command line.
#[macro_export]
macro_rules! err_ctx {
    // Message, src, span, help
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::GrammarError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    // Message, src, span
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::GrammarError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            ),
            source: None,
        }
    };
}
