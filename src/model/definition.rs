//! TOML definition format for the command model
//!
//! ```toml
//! [[options]]
//! long = "verbose"
//! short = "v"
//!
//! [[commands]]
//! name = "add"
//! description = "Add things"
//!
//!   [[commands.commands]]
//!   name = "item"
//!   aliases = ["it"]
//!   arguments = [{ name = "name", required = true }]
//!   options = [{ long = "force", short = "f" }]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use super::{ArgumentDescriptor, CommandDescriptor, CommandModel, OptionDescriptor};
use crate::error::{ConfigError, ModelError, Result};

/// Root of a model definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    /// Options accepted before the first command
    #[serde(default)]
    pub options: Vec<OptionDefinition>,

    /// Root commands
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommandDefinition {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub arguments: Vec<ArgumentDefinition>,

    #[serde(default)]
    pub options: Vec<OptionDefinition>,

    /// Sub-commands
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArgumentDefinition {
    pub name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub variadic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OptionDefinition {
    pub long: String,

    #[serde(default)]
    pub short: Option<char>,

    #[serde(default)]
    pub takes_value: bool,

    #[serde(default)]
    pub description: Option<String>,
}

impl ModelDefinition {
    /// Parse a definition from TOML text.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, ModelError> {
        toml::from_str(text).map_err(|e| ModelError::InvalidDefinition(e.to_string()))
    }

    /// Read a definition file.
    ///
    /// # Arguments
    /// * `path` - Path to the TOML model definition
    ///
    /// # Returns
    /// * `Result<ModelDefinition>` - Parsed definition or error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()).into(),
            _ => crate::error::CmdCompleteError::Io(e),
        })?;

        Ok(Self::from_toml_str(&text)?)
    }

    /// Validate and convert into an immutable [`CommandModel`].
    pub fn into_model(self) -> std::result::Result<CommandModel, ModelError> {
        let options = self.options.into_iter().map(OptionDescriptor::from).collect();
        let commands = self
            .commands
            .into_iter()
            .map(CommandDescriptor::from)
            .collect();

        CommandModel::with_global_options(commands, options)
    }
}

impl CommandModel {
    /// Load, parse and validate a model definition file in one step.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(ModelDefinition::load(path)?.into_model()?)
    }

    /// Parse and validate a model from TOML text.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, ModelError> {
        ModelDefinition::from_toml_str(text)?.into_model()
    }
}

impl From<CommandDefinition> for CommandDescriptor {
    fn from(def: CommandDefinition) -> Self {
        let mut cmd = CommandDescriptor::new(def.name).hidden(def.hidden);
        cmd.description = def.description;
        cmd.aliases = def.aliases;
        cmd.arguments = def.arguments.into_iter().map(Into::into).collect();
        cmd.options = def.options.into_iter().map(Into::into).collect();
        cmd.children = def.commands.into_iter().map(Into::into).collect();
        cmd
    }
}

impl From<ArgumentDefinition> for ArgumentDescriptor {
    fn from(def: ArgumentDefinition) -> Self {
        Self {
            name: def.name,
            required: def.required,
            variadic: def.variadic,
        }
    }
}

impl From<OptionDefinition> for OptionDescriptor {
    fn from(def: OptionDefinition) -> Self {
        Self {
            long: def.long,
            short: def.short,
            takes_value: def.takes_value,
            description: def.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CmdCompleteError;

    const SAMPLE: &str = r#"
        [[options]]
        long = "verbose"
        short = "v"

        [[commands]]
        name = "add"
        description = "Add things"

          [[commands.commands]]
          name = "item"
          aliases = ["it"]
          arguments = [{ name = "name", required = true }]
          options = [{ long = "force", short = "f" }, { long = "tag", takes_value = true }]

          [[commands.commands]]
          name = "category"

        [[commands]]
        name = "remove"
        hidden = true

        [[commands]]
        name = "list"
    "#;

    #[test]
    fn test_parse_sample_definition() {
        let model = CommandModel::from_toml_str(SAMPLE).unwrap();

        assert_eq!(model.top_level_candidates(""), vec!["add", "list"]);
        assert!(model.find_global_option("-v").is_some());

        let add = model.find_command("add").unwrap();
        assert_eq!(add.description(), Some("Add things"));
        assert_eq!(add.child_candidates(""), vec!["item", "category"]);

        let item = add.find_child("it").unwrap();
        assert_eq!(item.arguments().len(), 1);
        assert!(item.arguments()[0].is_required());
        assert!(item.find_option("-f").is_some());
        assert!(item.find_option("--tag").unwrap().takes_value());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = ModelDefinition::from_toml_str("[[commands]]\nname = \"a\"\nhiden = true\n")
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDefinition(_)));
    }

    #[test]
    fn test_validation_runs_on_conversion() {
        let err = CommandModel::from_toml_str(
            "[[commands]]\nname = \"a\"\n[[commands]]\nname = \"a\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateName { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.toml");
        fs::write(&path, SAMPLE).unwrap();

        let model = CommandModel::load(&path).unwrap();
        assert_eq!(model.commands().len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandModel::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(
            err,
            CmdCompleteError::Config(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_empty_definition_is_valid() {
        let model = CommandModel::from_toml_str("").unwrap();
        assert!(model.commands().is_empty());
        assert!(model.top_level_candidates("").is_empty());
    }
}
