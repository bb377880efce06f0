//! Option matcher.
//!
//! Recognizes the next token as an option of the current scope and binds its value.
//! An optional option value is greedy: the following token is taken whenever it parses as
//! the value type and does not itself name an option of the scope. Otherwise the default
//! is bound and nothing more is consumed.

use tracing::trace;

use super::context::{bind_token, ScopeState};
use crate::result::{BoundOption, BoundValue};
use crate::slot::ArgumentSlot;
use crate::syntax::TokenStream;
use crate::{err_ctx, err_msg, GrammarError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionMatch {
    Matched,
    NotAnOption,
}

/// Offers the next token to the scope's options.
pub(crate) fn match_option(
    stream: &mut TokenStream,
    state: &mut ScopeState<'_>,
) -> Result<OptionMatch, GrammarError> {
    let scope = state.scope;
    let Some(token) = stream.peek() else {
        return Ok(OptionMatch::NotAnOption);
    };
    let Some((index, slot)) = scope.resolve_flag(&token.text) else {
        return Ok(OptionMatch::NotAnOption);
    };
    if !slot.is_multiple() && state.has_seen(index) {
        return Err(err_ctx!(
            IllegalArgument,
            format!("option {} can occur only once", token.text),
            stream.source(),
            token.span
        ));
    }
    let flag = token.text.clone();
    stream.next();

    let value = match slot.value() {
        None => None,
        Some(argument) if argument.is_optional() => {
            Some(bind_optional_value(stream, state, argument, &flag)?)
        }
        Some(argument) => Some(bind_required_value(stream, argument, &flag)?),
    };
    trace!(flag = %flag, value = ?value.as_ref().map(|b| &b.value), "matched option");

    state.record_option(
        index,
        BoundOption {
            name: slot.name().to_string(),
            id: slot.info().id().to_string(),
            flag,
            value,
            multiple: slot.is_multiple(),
        },
    );
    Ok(OptionMatch::Matched)
}

fn bind_required_value(
    stream: &mut TokenStream,
    argument: &ArgumentSlot,
    flag: &str,
) -> Result<BoundValue, GrammarError> {
    let owner = format!("option {}", flag);
    let Some(token) = stream.next() else {
        return Err(err_ctx!(
            IllegalArgument,
            format!("{} requires a value of type {}", owner, argument.value_type()),
            stream.source(),
            stream.end_span()
        ));
    };
    bind_token(stream.source(), &token, argument, &owner)
}

fn bind_optional_value(
    stream: &mut TokenStream,
    state: &ScopeState<'_>,
    argument: &ArgumentSlot,
    flag: &str,
) -> Result<BoundValue, GrammarError> {
    let owner = format!("option {}", flag);
    let takes_next = stream.peek().is_some_and(|t| {
        state.scope.resolve_flag(&t.text).is_none() && argument.value_type().parse(&t.text).is_some()
    });
    if !takes_next {
        let default = argument.default_text().ok_or_else(|| {
            err_msg!(Configuration, "optional value of {} has no default", owner)
        })?;
        trace!(flag = %flag, default = %default, "option value defaulted");
        stream.inject_default(argument.name(), default);
    }
    let token = stream.next().ok_or_else(|| {
        err_ctx!(
            IllegalArgument,
            format!("{} requires a value of type {}", owner, argument.value_type()),
            stream.source(),
            stream.end_span()
        )
    })?;
    bind_token(stream.source(), &token, argument, &owner)
}
