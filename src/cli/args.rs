//! Command-line arguments of the `vyakarana` binary.
//!
//! The binary's own surface is parsed with `clap`; the tokens under test are handed to the
//! grammar engine untouched after `--`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "vyakarana",
    version,
    about = "Check command lines against a declarative grammar."
)]
pub struct VyakaranaArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Match a token vector against a grammar and print what it binds.
    Check {
        /// Grammar document (YAML, or JSON when the extension is `.json`).
        #[arg(short, long, required = true)]
        grammar: PathBuf,
        /// Print the bindings as JSON.
        #[arg(long)]
        json: bool,
        /// The command line to check, after `--`.
        #[arg(last = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Print the registered options, arguments and commands of a grammar.
    Outline {
        #[arg(short, long, required = true)]
        grammar: PathBuf,
    },
}
