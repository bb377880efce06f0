//! The `vyakarana` command-line interface.
//!
//! Loads a grammar document and either checks a token vector against it or prints its
//! outline. Failures are rendered through `miette` and end the process with status 1.

use std::path::Path;
use std::process;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, VyakaranaArgs};
use crate::cli::shell::{intercept, ShellRequest};
use crate::config::GrammarDocument;
use crate::registry::Grammar;
use crate::{err_msg, GrammarError};

pub mod args;
pub mod output;
pub mod shell;

/// The main entry point for the CLI.
pub fn run() {
    init_tracing();
    let args = VyakaranaArgs::parse();

    let result = match args.command {
        Command::Check { grammar, json, tokens } => handle_check(&grammar, json, &tokens),
        Command::Outline { grammar } => handle_outline(&grammar),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        process::exit(1);
    }
}

/// Events go to stderr, filtered by `RUST_LOG` (warnings only by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// SUBCOMMAND HANDLERS
// ============================================================================

fn handle_check(path: &Path, json: bool, tokens: &[String]) -> Result<(), GrammarError> {
    let grammar = load_grammar(path)?;
    let mut stdout = output::stdout();

    match intercept(&grammar, tokens) {
        Some(ShellRequest::Help { topic }) => {
            debug!(?topic, "help requested");
            return output::write_help(&mut stdout, &grammar, topic.as_deref());
        }
        Some(ShellRequest::Version) => {
            println!("{}", output::version_line(&grammar));
            return Ok(());
        }
        None => {}
    }

    let result = grammar.parse(tokens)?;
    info!(bindings = result.bindings().len(), "command line accepted");
    if json {
        println!("{}", output::bindings_json(&result)?);
        Ok(())
    } else {
        output::write_bindings(&mut stdout, &result)
            .map_err(|e| err_msg!(Io, "cannot write bindings: {}", e).with_source(e))
    }
}

fn handle_outline(path: &Path) -> Result<(), GrammarError> {
    let grammar = load_grammar(path)?;
    output::write_outline(&mut output::stdout(), &grammar)
        .map_err(|e| err_msg!(Io, "cannot write outline: {}", e).with_source(e))
}

fn load_grammar(path: &Path) -> Result<Grammar, GrammarError> {
    let grammar = GrammarDocument::from_path(path)?.build()?;
    debug!(grammar = %grammar.name(), commands = grammar.commands().len(), "grammar loaded");
    Ok(grammar)
}
