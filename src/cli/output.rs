//! Handles all user-facing output for the CLI.
//!
//! Everything renders into a [`WriteColor`], so the binary writes to a colour-aware
//! stdout while tests capture into a [`termcolor::Buffer`].

use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::registry::{Grammar, Scope};
use crate::result::{BindingKind, ParseResult};
use crate::slot::{ArgumentSlot, OptionSlot};
use crate::{err_msg, GrammarError};

/// Colour only when stdout is a terminal.
pub fn stdout() -> StandardStream {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

// ============================================================================
// BINDINGS
// ============================================================================

/// One line per bound value, in enumeration order.
pub fn write_bindings<W: WriteColor>(out: &mut W, result: &ParseResult) -> io::Result<()> {
    if let Some(command) = result.command() {
        heading(out, &format!("command {}", command.name()))?;
    }
    for binding in result.bindings() {
        let kind = match binding.kind {
            BindingKind::Option => "option",
            BindingKind::Argument => "argument",
        };
        if let Some(command) = binding.command {
            write!(out, "{}.", command)?;
        }
        write!(out, "{} ", kind)?;
        out.set_color(ColorSpec::new().set_bold(true))?;
        write!(out, "{}", binding.id)?;
        out.reset()?;
        match binding.value {
            Some(value) => writeln!(out, " = {}", value)?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

pub fn bindings_json(result: &ParseResult) -> Result<String, GrammarError> {
    serde_json::to_string_pretty(&result.bindings())
        .map_err(|e| err_msg!(Io, "cannot serialize bindings: {}", e).with_source(e))
}

// ============================================================================
// OUTLINE / HELP
// ============================================================================

/// The registered structure of a grammar: global options, then arguments or commands.
pub fn write_outline<W: WriteColor>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(out, "{}", grammar.name())?;
    out.reset()?;
    match grammar.version() {
        Some(version) => writeln!(out, " {}", version)?,
        None => writeln!(out)?,
    }
    write_scope(out, grammar.globals(), "")?;
    if grammar.uses_commands() {
        heading(out, "commands:")?;
        let rows: Vec<(String, String)> = grammar
            .commands()
            .iter()
            .map(|c| (c.info().all_names().collect::<Vec<_>>().join(", "), c.description().to_string()))
            .collect();
        write_rows(out, &rows, "  ")?;
    }
    Ok(())
}

/// Help for one command, or the whole outline when `topic` is `None`.
pub fn write_help<W: WriteColor>(out: &mut W, grammar: &Grammar, topic: Option<&str>) -> Result<(), GrammarError> {
    let written = match topic {
        None => write_outline(out, grammar),
        Some(name) => {
            let command = grammar.command(name).ok_or_else(|| {
                err_msg!(CommandNotFound, "'{}' is not a command of {}", name, grammar.name())
            })?;
            heading(out, &format!("{} {}", grammar.name(), command.name()))
                .and_then(|_| writeln!(out, "{}", command.description()))
                .and_then(|_| write_scope(out, command.scope(), ""))
        }
    };
    written.map_err(|e| err_msg!(Io, "cannot write help: {}", e).with_source(e))
}

pub fn version_line(grammar: &Grammar) -> String {
    match grammar.version() {
        Some(version) => format!("{} {}", grammar.name(), version),
        None => grammar.name().to_string(),
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn heading<W: WriteColor>(out: &mut W, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()?;
    writeln!(out)
}

fn write_scope<W: WriteColor>(out: &mut W, scope: &Scope, indent: &str) -> io::Result<()> {
    if !scope.options().is_empty() {
        heading(out, &format!("{}options:", indent))?;
        let rows: Vec<_> = scope.options().iter().map(option_row).collect();
        write_rows(out, &rows, &format!("{}  ", indent))?;
    }
    if !scope.arguments().is_empty() {
        heading(out, &format!("{}arguments:", indent))?;
        let rows: Vec<_> = scope.arguments().iter().map(argument_row).collect();
        write_rows(out, &rows, &format!("{}  ", indent))?;
    }
    Ok(())
}

fn option_row(option: &OptionSlot) -> (String, String) {
    let mut left = option.flags().collect::<Vec<_>>().join(", ");
    let mut right = option.info().description().to_string();
    if let Some(value) = option.value() {
        let name = if value.is_optional() {
            format!(" [{}]", value.name())
        } else {
            format!(" {}", value.name())
        };
        left.push_str(&name);
        right.push_str(&value_details(value));
    }
    let mut marks = Vec::new();
    if option.is_required() {
        marks.push("required");
    }
    if option.is_multiple() {
        marks.push("repeatable");
    }
    if !marks.is_empty() {
        right.push_str(&format!(" <{}>", marks.join(", ")));
    }
    (left, right)
}

fn argument_row(argument: &ArgumentSlot) -> (String, String) {
    let left = if argument.is_optional() {
        format!("[{}]", argument.name())
    } else {
        argument.name().to_string()
    };
    let right = format!("{}{}", argument.info().description(), value_details(argument));
    (left, right)
}

fn value_details(slot: &ArgumentSlot) -> String {
    let mut parts = vec![slot.value_type().to_string()];
    if let Some(default) = slot.default_text() {
        parts.push(format!("default {}", default));
    }
    parts.extend(slot.constraints().iter().map(|c| c.description()));
    format!(" ({})", parts.join("; "))
}

fn write_rows<W: WriteColor>(out: &mut W, rows: &[(String, String)], indent: &str) -> io::Result<()> {
    let width = rows.iter().map(|(left, _)| left.width()).max().unwrap_or(0);
    for (left, right) in rows {
        let pad = width - left.width();
        writeln!(out, "{}{}{}   {}", indent, left, " ".repeat(pad), right)?;
    }
    Ok(())
}
