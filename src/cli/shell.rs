//! Help and version requests, recognized before a token vector reaches the engine.
//!
//! A grammar never declares these itself. If it does register an option spelled `--help`
//! or `--version`, the grammar's own option wins and nothing is intercepted.

use crate::registry::Grammar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellRequest {
    /// Help for the whole grammar, or for one command.
    Help { topic: Option<String> },
    Version,
}

const HELP_FLAGS: &[&str] = &["--help", "-?"];
const VERSION_FLAG: &str = "--version";

pub fn intercept<S: AsRef<str>>(grammar: &Grammar, tokens: &[S]) -> Option<ShellRequest> {
    let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    let declared = |flag: &str| grammar.globals().resolve_flag(flag).is_some();

    if tokens.contains(&VERSION_FLAG) && !declared(VERSION_FLAG) {
        return Some(ShellRequest::Version);
    }

    // `help` and `help CMD` only in leading position, and only when no command owns the word.
    if grammar.uses_commands() && tokens.first() == Some(&"help") && grammar.command("help").is_none() {
        return Some(ShellRequest::Help {
            topic: tokens.get(1).map(|t| t.to_string()),
        });
    }

    let wants_help = tokens
        .iter()
        .any(|t| HELP_FLAGS.contains(t) && !declared(*t));
    if !wants_help {
        return None;
    }
    let topic = tokens
        .iter()
        .find_map(|t| grammar.command(t))
        .map(|command| command.name().to_string());
    Some(ShellRequest::Help { topic })
}
