//! Positional reconciler.
//!
//! Binds a run of non-option tokens to the scope's argument slots. With `k` tokens for `M`
//! mandatory and `O` optional slots (`M <= k <= M + O`), slots are walked left to right and
//! an optional slot takes a real token only while more tokens remain than mandatory slots
//! still ahead of it. Otherwise its default is spliced into the stream at its position, so
//! positional order is preserved whether the optional slot sits between mandatory ones or
//! a group of optional slots trails them.

use tracing::trace;

use super::context::{bind_token, ScopeState};
use crate::result::BoundArgument;
use crate::syntax::TokenStream;
use crate::{err_ctx, err_msg, GrammarError};

pub(crate) fn reconcile(stream: &mut TokenStream, state: &mut ScopeState<'_>) -> Result<(), GrammarError> {
    let scope = state.scope;
    let mandatory = scope.mandatory_count();
    let max = scope.max_arguments();
    let run = stream.leading_run();
    let for_command = scope
        .command()
        .map(|name| format!(" for command '{}'", name))
        .unwrap_or_default();

    if run < mandatory {
        return Err(err_ctx!(
            IllegalArgument,
            format!(
                "too few arguments{}, expected min {} got {}; check that there are no options between arguments",
                for_command, mandatory, run
            ),
            stream.source(),
            stream.span_at(run)
        ));
    }
    if run > max {
        return Err(err_ctx!(
            IllegalArgument,
            format!("too many arguments{}, expected max {} got {}", for_command, max, run),
            stream.source(),
            stream.span_at(max)
        ));
    }

    let mut remaining = run;
    let mut mandatory_ahead = mandatory;
    for slot in scope.arguments() {
        if slot.is_optional() {
            if remaining <= mandatory_ahead {
                let default = slot.default_text().ok_or_else(|| {
                    err_msg!(Configuration, "optional argument '{}' has no default", slot.name())
                })?;
                trace!(argument = %slot.name(), default = %default, "argument defaulted");
                stream.inject_default(slot.name(), default);
            } else {
                remaining -= 1;
            }
        } else {
            mandatory_ahead -= 1;
            remaining -= 1;
        }

        let owner = format!("argument {}", slot.name());
        let token = stream.next().ok_or_else(|| {
            err_ctx!(
                IllegalArgument,
                format!("{} is missing", owner),
                stream.source(),
                stream.end_span()
            )
        })?;
        let value = bind_token(stream.source(), &token, slot, &owner)?;
        state.record_argument(BoundArgument {
            name: slot.name().to_string(),
            id: slot.info().id().to_string(),
            value,
        });
    }
    state.finish_positionals();
    Ok(())
}
