//! Per-parse mutable state.
//!
//! The grammar itself is frozen; everything a parse accumulates lives here and is dropped
//! when the parse returns.

use std::collections::HashSet;

use crate::diagnostics::SourceArc;
use crate::registry::Scope;
use crate::result::{BoundArgument, BoundOption, BoundValue, Provenance, ScopeResult};
use crate::slot::ArgumentSlot;
use crate::syntax::{Token, TokenOrigin};
use crate::{err_ctx, GrammarError};

/// What one scope has bound so far.
#[derive(Debug)]
pub(crate) struct ScopeState<'g> {
    pub(crate) scope: &'g Scope,
    seen: HashSet<usize>,
    options: Vec<BoundOption>,
    arguments: Vec<BoundArgument>,
    positionals_bound: bool,
}

impl<'g> ScopeState<'g> {
    pub(crate) fn new(scope: &'g Scope) -> Self {
        Self {
            scope,
            seen: HashSet::new(),
            options: Vec::new(),
            arguments: Vec::new(),
            positionals_bound: false,
        }
    }

    pub(crate) fn has_seen(&self, option: usize) -> bool {
        self.seen.contains(&option)
    }

    pub(crate) fn record_option(&mut self, option: usize, bound: BoundOption) {
        self.seen.insert(option);
        self.options.push(bound);
    }

    pub(crate) fn record_argument(&mut self, bound: BoundArgument) {
        self.arguments.push(bound);
    }

    /// Whether the positional run of this scope has been consumed.
    pub(crate) fn positionals_bound(&self) -> bool {
        self.positionals_bound
    }

    pub(crate) fn finish_positionals(&mut self) {
        self.positionals_bound = true;
    }

    pub(crate) fn into_result(self) -> ScopeResult {
        ScopeResult::new(self.options, self.arguments, self.scope.names().clone())
    }
}

/// Parses `token` as `slot`'s type and runs its constraints.
///
/// `owner` names the slot in messages, e.g. "argument PID" or "option -a".
pub(crate) fn bind_token(
    source: &SourceArc,
    token: &Token,
    slot: &ArgumentSlot,
    owner: &str,
) -> Result<BoundValue, GrammarError> {
    let value = slot.value_type().parse(&token.text).ok_or_else(|| {
        err_ctx!(
            IllegalArgument,
            format!(
                "{} expects a value of type {}, got '{}'",
                owner,
                slot.value_type(),
                token.text
            ),
            source,
            token.span
        )
    })?;
    if let Err(violation) = slot.check(&value) {
        let accepted: Vec<String> = slot.constraints().iter().map(|c| c.description()).collect();
        return Err(err_ctx!(
            Constraint,
            violation.message,
            source,
            token.span,
            format!("{} accepts {}", owner, accepted.join(", "))
        ));
    }
    let provenance = match token.origin {
        TokenOrigin::Argument { position } => Provenance::Token { position },
        TokenOrigin::Default { .. } => Provenance::Default,
    };
    Ok(BoundValue { value, provenance })
}
