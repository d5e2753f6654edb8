//! Static command model
//!
//! The command model is the immutable tree describing every command a
//! program exposes: names, aliases, visibility, positional arguments,
//! options and nested sub-commands. It is built once (from a TOML
//! definition or through the builder methods below), validated at
//! construction, and then shared read-only through an `Arc`.
//!
//! # Examples
//!
//! ```
//! use cmdcomplete::model::{CommandDescriptor, CommandModel};
//!
//! let model = CommandModel::new(vec![
//!     CommandDescriptor::new("add")
//!         .child(CommandDescriptor::new("item"))
//!         .child(CommandDescriptor::new("category")),
//!     CommandDescriptor::new("remove").hidden(true),
//!     CommandDescriptor::new("list"),
//! ])
//! .unwrap();
//!
//! assert_eq!(model.top_level_candidates(""), vec!["add", "list"]);
//! ```

mod definition;

pub use definition::{ArgumentDefinition, CommandDefinition, ModelDefinition, OptionDefinition};

use std::collections::HashSet;
use std::fmt;

use crate::error::ModelError;

const ROOT_PATH: &str = "<root>";

/// A single command (branch or leaf) in the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    name: String,
    description: Option<String>,
    hidden: bool,
    aliases: Vec<String>,
    arguments: Vec<ArgumentDescriptor>,
    options: Vec<OptionDescriptor>,
    children: Vec<CommandDescriptor>,
}

/// Positional argument accepted by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    name: String,
    /// Shown in usage only; the parser accepts lines that omit it.
    required: bool,
    variadic: bool,
}

/// `--long` / `-s` option accepted by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    long: String,
    short: Option<char>,
    takes_value: bool,
    description: Option<String>,
}

/// Validated, immutable command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandModel {
    commands: Vec<CommandDescriptor>,
    global_options: Vec<OptionDescriptor>,
}

impl CommandDescriptor {
    /// Create a visible command with no children, arguments or options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            hidden: false,
            aliases: Vec::new(),
            arguments: Vec::new(),
            options: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Hidden commands are parsed normally but never offered as completions.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    pub fn child(mut self, child: CommandDescriptor) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn arguments(&self) -> &[ArgumentDescriptor] {
        &self.arguments
    }

    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    pub fn children(&self) -> &[CommandDescriptor] {
        &self.children
    }

    /// Branch commands have sub-commands; leaves do not.
    pub fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check whether `token` names this command.
    ///
    /// Aliases are only considered when `include_aliases` is set.
    pub fn matches(&self, token: &str, include_aliases: bool) -> bool {
        self.name == token || (include_aliases && self.aliases.iter().any(|a| a == token))
    }

    /// First direct child named `token` (by name or alias), in declaration order.
    pub fn find_child(&self, token: &str) -> Option<&CommandDescriptor> {
        find_command(&self.children, token)
    }

    /// Option declared on this command matching a `--long` or `-s` spelling.
    pub fn find_option(&self, spelling: &str) -> Option<&OptionDescriptor> {
        find_option(&self.options, spelling)
    }

    /// Names of visible children starting with `prefix`, in declaration order.
    pub fn child_candidates(&self, prefix: &str) -> Vec<String> {
        visible_names(&self.children, prefix)
    }
}

impl ArgumentDescriptor {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            variadic: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            variadic: false,
        }
    }

    /// Absorb every remaining positional value.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Usage form: `<name>` when required, `[name]` otherwise, `...` when variadic.
    pub fn usage(&self) -> String {
        let dots = if self.variadic { "..." } else { "" };
        if self.required {
            format!("<{}>{dots}", self.name)
        } else {
            format!("[{}]{dots}", self.name)
        }
    }
}

impl OptionDescriptor {
    /// Boolean switch, e.g. `--force`.
    pub fn flag(long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            takes_value: false,
            description: None,
        }
    }

    /// Option that consumes a value, e.g. `--name NAME` or `--name=NAME`.
    pub fn value(long: impl Into<String>) -> Self {
        Self {
            takes_value: true,
            ..Self::flag(long)
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Match a raw spelling such as `--force` or `-f`.
    pub fn matches(&self, spelling: &str) -> bool {
        if let Some(long) = spelling.strip_prefix("--") {
            return long == self.long;
        }
        match (spelling.strip_prefix('-'), self.short) {
            (Some(rest), Some(short)) => {
                let mut chars = rest.chars();
                chars.next() == Some(short) && chars.next().is_none()
            }
            _ => false,
        }
    }
}

impl CommandModel {
    /// Build and validate a model from its root commands.
    ///
    /// # Errors
    /// Returns a [`ModelError`] describing the first structural problem found.
    pub fn new(commands: Vec<CommandDescriptor>) -> Result<Self, ModelError> {
        Self::with_global_options(commands, Vec::new())
    }

    /// Build a model that also accepts options before the first command.
    pub fn with_global_options(
        commands: Vec<CommandDescriptor>,
        global_options: Vec<OptionDescriptor>,
    ) -> Result<Self, ModelError> {
        validate_options(ROOT_PATH, &global_options)?;
        validate_siblings(ROOT_PATH, &commands)?;

        Ok(Self {
            commands,
            global_options,
        })
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    pub fn global_options(&self) -> &[OptionDescriptor] {
        &self.global_options
    }

    /// Root command named `token` (by name or alias).
    pub fn find_command(&self, token: &str) -> Option<&CommandDescriptor> {
        find_command(&self.commands, token)
    }

    pub fn find_global_option(&self, spelling: &str) -> Option<&OptionDescriptor> {
        find_option(&self.global_options, spelling)
    }

    /// Names of visible root commands starting with `prefix`, in declaration order.
    pub fn top_level_candidates(&self, prefix: &str) -> Vec<String> {
        visible_names(&self.commands, prefix)
    }
}

impl fmt::Display for CommandModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_level(
            f: &mut fmt::Formatter<'_>,
            commands: &[CommandDescriptor],
            depth: usize,
        ) -> fmt::Result {
            for cmd in commands.iter().filter(|c| !c.is_hidden()) {
                let indent = "  ".repeat(depth);
                let label = std::iter::once(cmd.name().to_string())
                    .chain(cmd.arguments().iter().map(ArgumentDescriptor::usage))
                    .collect::<Vec<_>>()
                    .join(" ");
                match cmd.description() {
                    Some(desc) => writeln!(f, "{indent}{label:<20} {desc}")?,
                    None => writeln!(f, "{indent}{label}")?,
                }
                write_level(f, cmd.children(), depth + 1)?;
            }
            Ok(())
        }

        write_level(f, &self.commands, 0)
    }
}

fn find_command<'a>(commands: &'a [CommandDescriptor], token: &str) -> Option<&'a CommandDescriptor> {
    commands.iter().find(|c| c.matches(token, true))
}

fn find_option<'a>(options: &'a [OptionDescriptor], spelling: &str) -> Option<&'a OptionDescriptor> {
    options.iter().find(|o| o.matches(spelling))
}

fn visible_names(commands: &[CommandDescriptor], prefix: &str) -> Vec<String> {
    commands
        .iter()
        .filter(|c| !c.is_hidden())
        .map(|c| c.name())
        .filter(|name| name.starts_with(prefix))
        .map(String::from)
        .collect()
}

/* ========================= Validation ========================= */

fn validate_name(parent: &str, name: &str) -> Result<(), ModelError> {
    if name.is_empty() {
        return Err(ModelError::EmptyName {
            parent: parent.to_string(),
        });
    }
    if name.starts_with('-') || name.chars().any(char::is_whitespace) {
        return Err(ModelError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn validate_siblings(parent: &str, commands: &[CommandDescriptor]) -> Result<(), ModelError> {
    let mut seen = HashSet::new();

    for cmd in commands {
        for name in std::iter::once(&cmd.name).chain(cmd.aliases.iter()) {
            validate_name(parent, name)?;
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateName {
                    parent: parent.to_string(),
                    name: name.clone(),
                });
            }
        }
    }

    for cmd in commands {
        let path = if parent == ROOT_PATH {
            cmd.name.clone()
        } else {
            format!("{parent} {}", cmd.name)
        };
        validate_arguments(&path, &cmd.arguments)?;
        validate_options(&path, &cmd.options)?;
        validate_siblings(&path, &cmd.children)?;
    }

    Ok(())
}

fn validate_arguments(command: &str, arguments: &[ArgumentDescriptor]) -> Result<(), ModelError> {
    let last = arguments.len().saturating_sub(1);
    for (idx, arg) in arguments.iter().enumerate() {
        if arg.name.is_empty() {
            return Err(ModelError::EmptyName {
                parent: command.to_string(),
            });
        }
        if arg.variadic && idx != last {
            return Err(ModelError::MisplacedVariadic {
                command: command.to_string(),
                argument: arg.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_options(command: &str, options: &[OptionDescriptor]) -> Result<(), ModelError> {
    let mut longs = HashSet::new();
    let mut shorts = HashSet::new();

    for opt in options {
        validate_name(command, &opt.long)?;
        if opt.long.contains('=') {
            return Err(ModelError::InvalidName(opt.long.clone()));
        }
        if !longs.insert(opt.long.as_str()) {
            return Err(ModelError::DuplicateOption {
                command: command.to_string(),
                option: format!("--{}", opt.long),
            });
        }
        if let Some(short) = opt.short {
            if short == '-' || short.is_whitespace() {
                return Err(ModelError::InvalidName(format!("-{short}")));
            }
            if !shorts.insert(short) {
                return Err(ModelError::DuplicateOption {
                    command: command.to_string(),
                    option: format!("-{short}"),
                });
            }
        }
    }
    Ok(())
}
