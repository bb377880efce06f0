//! Command dispatcher: the top-level state machine of a parse.
//!
//! ```text
//! Start -> GlobalOptions <-> (Arguments | SelectCommand) -> CommandScope -> Done
//! ```
//!
//! Any error ends the parse immediately.

use tracing::{debug, trace};

use super::context::ScopeState;
use super::options::{match_option, OptionMatch};
use super::positional::reconcile;
use crate::command::RegisteredCommand;
use crate::registry::Grammar;
use crate::result::{CommandResult, ParseResult};
use crate::syntax::{is_option_like, TokenStream};
use crate::{err_ctx, GrammarError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchState {
    Start,
    GlobalOptions,
    Arguments,
    SelectCommand,
    CommandScope,
    Done,
}

struct Selected<'g> {
    command: &'g RegisteredCommand,
    state: ScopeState<'g>,
}

pub(crate) fn dispatch(grammar: &Grammar, mut stream: TokenStream) -> Result<ParseResult, GrammarError> {
    let mut globals = ScopeState::new(grammar.globals());
    let mut selected: Option<Selected<'_>> = None;
    let mut state = DispatchState::Start;

    loop {
        trace!(?state, remaining = stream.len(), "dispatch");
        state = match state {
            DispatchState::Start => DispatchState::GlobalOptions,
            DispatchState::GlobalOptions => {
                if stream.is_empty() {
                    break;
                }
                if match_option(&mut stream, &mut globals)? == OptionMatch::Matched {
                    DispatchState::GlobalOptions
                } else if is_option_like(&token_text(&stream)) {
                    return Err(not_an_option(&stream, None));
                } else if grammar.uses_commands() {
                    DispatchState::SelectCommand
                } else {
                    DispatchState::Arguments
                }
            }
            DispatchState::Arguments => {
                if globals.positionals_bound() {
                    return Err(stray_token(&stream, None));
                }
                reconcile(&mut stream, &mut globals)?;
                DispatchState::GlobalOptions
            }
            DispatchState::SelectCommand => {
                let Some(token) = stream.next() else {
                    break;
                };
                let Some(command) = grammar.command(&token.text) else {
                    return Err(err_ctx!(
                        CommandNotFound,
                        format!("'{}' is not a command of {}", token.text, grammar.name()),
                        stream.source(),
                        token.span,
                        format!("available commands: {}", command_list(grammar))
                    ));
                };
                debug!(command = %command.name(), "command selected");
                selected = Some(Selected {
                    command,
                    state: ScopeState::new(command.scope()),
                });
                DispatchState::CommandScope
            }
            DispatchState::CommandScope => {
                let Some(current) = selected.as_mut() else {
                    break;
                };
                if stream.is_empty() {
                    DispatchState::Done
                } else if match_option(&mut stream, &mut current.state)? == OptionMatch::Matched {
                    DispatchState::CommandScope
                } else if is_option_like(&token_text(&stream)) {
                    return Err(not_an_option(&stream, Some(current.command.name())));
                } else if current.state.positionals_bound() {
                    return Err(stray_token(&stream, Some(current.command.name())));
                } else {
                    reconcile(&mut stream, &mut current.state)?;
                    DispatchState::CommandScope
                }
            }
            DispatchState::Done => break,
        };
    }

    finish_scope(&mut stream, &mut globals)?;
    let command = match selected {
        Some(Selected { command, mut state }) => {
            finish_scope(&mut stream, &mut state)?;
            Some(CommandResult::new(
                command.name().to_string(),
                command.id().to_string(),
                state.into_result(),
            ))
        }
        None if grammar.uses_commands() => {
            return Err(err_ctx!(
                CommandNotFound,
                "no command given",
                stream.source(),
                stream.end_span(),
                format!("available commands: {}", command_list(grammar))
            ));
        }
        None => None,
    };
    Ok(ParseResult::new(globals.into_result(), command))
}

fn token_text(stream: &TokenStream) -> String {
    stream.peek().map(|t| t.text.clone()).unwrap_or_default()
}

/// Terminal checks of a scope once the stream is exhausted.
fn finish_scope(stream: &mut TokenStream, state: &mut ScopeState<'_>) -> Result<(), GrammarError> {
    let scope = state.scope;
    for (index, option) in scope.options().iter().enumerate() {
        if option.is_required() && !state.has_seen(index) {
            return Err(err_ctx!(
                IllegalArgument,
                format!("mandatory option {} missing{}", option.flag(), command_suffix(scope.command())),
                stream.source(),
                stream.end_span()
            ));
        }
    }
    if state.positionals_bound() || scope.arguments().is_empty() {
        return Ok(());
    }
    if let Some(missing) = scope.arguments().iter().find(|a| !a.is_optional()) {
        return Err(err_ctx!(
            IllegalArgument,
            format!("mandatory argument {} missing{}", missing.name(), command_suffix(scope.command())),
            stream.source(),
            stream.end_span()
        ));
    }
    // Only optional slots and no tokens left: bind their defaults.
    reconcile(stream, state)
}

fn command_suffix(command: Option<&str>) -> String {
    command
        .map(|name| format!(" for command '{}'", name))
        .unwrap_or_default()
}

fn not_an_option(stream: &TokenStream, command: Option<&str>) -> GrammarError {
    let text = token_text(stream);
    err_ctx!(
        IllegalArgument,
        format!("{} is not a valid option{}", text, command_suffix(command)),
        stream.source(),
        stream.current_span()
    )
}

fn stray_token(stream: &TokenStream, command: Option<&str>) -> GrammarError {
    let text = token_text(stream);
    err_ctx!(
        IllegalArgument,
        format!(
            "'{}' cannot be interpreted as a proper command line argument{}",
            text,
            command_suffix(command)
        ),
        stream.source(),
        stream.current_span(),
        "arguments must form one contiguous run"
    )
}

fn command_list(grammar: &Grammar) -> String {
    grammar
        .commands()
        .iter()
        .map(RegisteredCommand::name)
        .collect::<Vec<_>>()
        .join(", ")
}
