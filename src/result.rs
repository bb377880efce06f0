//! Parse results: immutable snapshots of what a token vector bound.
//!
//! A [`ParseResult`] does not borrow the grammar. Lookups accept canonical or alternative
//! names, and [`ParseResult::bindings`] enumerates every bound value in a stable order for
//! binders that copy values into caller-owned storage.

use std::sync::Arc;

use serde::Serialize;

use crate::registry::NameIndex;
use crate::value::Value;

/// Where a bound value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "from")]
pub enum Provenance {
    /// The token at this index of the caller's argument list.
    Token { position: usize },
    /// The slot's declared default.
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundValue {
    pub value: Value,
    pub provenance: Provenance,
}

/// One occurrence of an option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundOption {
    pub name: String,
    pub id: String,
    /// The spelling used on the command line.
    pub flag: String,
    /// `None` for options without an argument: the option is merely present.
    pub value: Option<BoundValue>,
    pub multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundArgument {
    pub name: String,
    pub id: String,
    pub value: BoundValue,
}

// ============================================================================
// SCOPE RESULTS
// ============================================================================

/// Bindings of one scope: the global one, or the selected command's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeResult {
    options: Vec<BoundOption>,
    arguments: Vec<BoundArgument>,
    #[serde(skip)]
    names: Arc<NameIndex>,
}

impl ScopeResult {
    pub(crate) fn new(options: Vec<BoundOption>, arguments: Vec<BoundArgument>, names: Arc<NameIndex>) -> Self {
        Self {
            options,
            arguments,
            names,
        }
    }

    /// Every option occurrence, in command-line order.
    pub fn options(&self) -> &[BoundOption] {
        &self.options
    }

    /// Every argument, in slot order.
    pub fn arguments(&self) -> &[BoundArgument] {
        &self.arguments
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    /// First occurrence of an option.
    pub fn option(&self, name: &str) -> Option<&BoundOption> {
        self.occurrences(name).next()
    }

    /// All occurrences of an option, in order.
    pub fn occurrences<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a BoundOption> + 'a {
        let canonical = self.names.option(name).map(str::to_string);
        self.options
            .iter()
            .filter(move |o| canonical.as_deref() == Some(o.name.as_str()))
    }

    /// Value of the first occurrence; `None` if absent or if the option takes no argument.
    pub fn option_value(&self, name: &str) -> Option<&Value> {
        self.option(name)
            .and_then(|o| o.value.as_ref())
            .map(|b| &b.value)
    }

    /// Values of every occurrence of a multi-occurrence option.
    pub fn option_values(&self, name: &str) -> Vec<&Value> {
        self.occurrences(name)
            .filter_map(|o| o.value.as_ref().map(|b| &b.value))
            .collect()
    }

    pub fn argument(&self, name: &str) -> Option<&BoundArgument> {
        let canonical = self.names.argument(name)?;
        self.arguments.iter().find(|a| a.name == canonical)
    }

    pub fn argument_value(&self, name: &str) -> Option<&Value> {
        self.argument(name).map(|a| &a.value.value)
    }
}

/// The selected command and its own bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    name: String,
    id: String,
    #[serde(flatten)]
    scope: ScopeResult,
}

impl CommandResult {
    pub(crate) fn new(name: String, id: String, scope: ScopeResult) -> Self {
        Self { name, id, scope }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scope(&self) -> &ScopeResult {
        &self.scope
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.scope.has_option(name)
    }

    pub fn option_value(&self, name: &str) -> Option<&Value> {
        self.scope.option_value(name)
    }

    pub fn option_values(&self, name: &str) -> Vec<&Value> {
        self.scope.option_values(name)
    }

    pub fn argument_value(&self, name: &str) -> Option<&Value> {
        self.scope.argument_value(name)
    }
}

// ============================================================================
// PARSE RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    globals: ScopeResult,
    command: Option<CommandResult>,
}

impl ParseResult {
    pub(crate) fn new(globals: ScopeResult, command: Option<CommandResult>) -> Self {
        Self { globals, command }
    }

    pub fn globals(&self) -> &ScopeResult {
        &self.globals
    }

    pub fn command(&self) -> Option<&CommandResult> {
        self.command.as_ref()
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.globals.has_option(name)
    }

    pub fn option_value(&self, name: &str) -> Option<&Value> {
        self.globals.option_value(name)
    }

    pub fn option_values(&self, name: &str) -> Vec<&Value> {
        self.globals.option_values(name)
    }

    pub fn argument_value(&self, name: &str) -> Option<&Value> {
        self.globals.argument_value(name)
    }

    /// Every bound value: global options, global arguments, then the command's options and
    /// arguments. Options appear in command-line order, arguments in slot order.
    pub fn bindings(&self) -> Vec<Binding<'_>> {
        let mut out = Vec::new();
        collect_bindings(&mut out, None, &self.globals);
        if let Some(command) = &self.command {
            collect_bindings(&mut out, Some(command.name()), &command.scope);
        }
        out
    }
}

/// One entry of the binding enumeration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding<'a> {
    /// Owning command, `None` for global slots.
    pub command: Option<&'a str>,
    pub kind: BindingKind,
    pub id: &'a str,
    /// `None` marks an option that is present without a value.
    pub value: Option<&'a Value>,
    /// Part of a multi-occurrence group.
    pub multiple: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Option,
    Argument,
}

fn collect_bindings<'a>(out: &mut Vec<Binding<'a>>, command: Option<&'a str>, scope: &'a ScopeResult) {
    out.extend(scope.options.iter().map(|o| Binding {
        command,
        kind: BindingKind::Option,
        id: &o.id,
        value: o.value.as_ref().map(|b| &b.value),
        multiple: o.multiple,
    }));
    out.extend(scope.arguments.iter().map(|a| Binding {
        command,
        kind: BindingKind::Argument,
        id: &a.id,
        value: Some(&a.value.value),
        multiple: false,
    }));
}
