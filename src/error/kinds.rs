use std::{fmt, io};

/// Crate-wide `Result` type using [`CmdCompleteError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, CmdCompleteError>;

/// Top-level error type for cmdcomplete operations.
///
/// None of these are produced while resolving a completion request; they
/// surface only while building the command model or loading configuration.
#[derive(Debug)]
pub enum CmdCompleteError {
    /// Malformed command model.
    Model(ModelError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Command model construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A command, alias or argument was given an empty name.
    EmptyName {
        /// Path of the enclosing command ("<root>" at the top level).
        parent: String,
    },

    /// Name contains whitespace or starts with '-'.
    InvalidName(String),

    /// Two siblings share a name or alias.
    DuplicateName { parent: String, name: String },

    /// Option declared twice on the same command.
    DuplicateOption { command: String, option: String },

    /// Only the last positional argument may be variadic.
    MisplacedVariadic { command: String, argument: String },

    /// Definition file could not be deserialized.
    InvalidDefinition(String),
}

/// Grammar parser errors.
///
/// This is the signal the completion engine reacts to with its single
/// strip-and-retry fallback. It is consumed there and never wrapped into
/// [`CmdCompleteError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Token does not name a known command at this position.
    UnknownCommand(String),

    /// Option is not declared on the current command.
    UnknownOption(String),

    /// Value-taking option at the end of the line.
    MissingOptionValue(String),

    /// Positional value with no argument slot left for it.
    UnexpectedArgument(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for CmdCompleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmdCompleteError::Model(e) => write!(f, "Invalid command model: {e}"),
            CmdCompleteError::Config(e) => write!(f, "Configuration error: {e}"),
            CmdCompleteError::Io(e) => write!(f, "I/O error: {e}"),
            CmdCompleteError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptyName { parent } => write!(f, "empty name under '{parent}'"),
            ModelError::InvalidName(name) => write!(f, "invalid name '{name}'"),
            ModelError::DuplicateName { parent, name } => {
                write!(f, "duplicate name '{name}' under '{parent}'")
            }
            ModelError::DuplicateOption { command, option } => {
                write!(f, "option '{option}' declared twice on '{command}'")
            }
            ModelError::MisplacedVariadic { command, argument } => write!(
                f,
                "variadic argument '{argument}' must be the last argument of '{command}'"
            ),
            ModelError::InvalidDefinition(msg) => write!(f, "invalid definition: {msg}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownCommand(name) => write!(f, "Unknown command '{name}'"),
            ParseError::UnknownOption(name) => write!(f, "Unknown option '{name}'"),
            ParseError::MissingOptionValue(name) => {
                write!(f, "Expected a value for option '{name}'")
            }
            ParseError::UnexpectedArgument(value) => {
                write!(f, "Unexpected argument '{value}'")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for CmdCompleteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CmdCompleteError::Model(e) => Some(e),
            CmdCompleteError::Config(e) => Some(e),
            CmdCompleteError::Io(e) => Some(e),
            CmdCompleteError::Generic(_) => None,
        }
    }
}
impl std::error::Error for ModelError {}
impl std::error::Error for ParseError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to CmdCompleteError ========================= */

impl From<io::Error> for CmdCompleteError {
    fn from(err: io::Error) -> Self {
        CmdCompleteError::Io(err)
    }
}

impl From<ModelError> for CmdCompleteError {
    fn from(err: ModelError) -> Self {
        CmdCompleteError::Model(err)
    }
}

impl From<ConfigError> for CmdCompleteError {
    fn from(err: ConfigError) -> Self {
        CmdCompleteError::Config(err)
    }
}

impl From<serde_json::Error> for CmdCompleteError {
    fn from(err: serde_json::Error) -> Self {
        CmdCompleteError::Generic(format!("JSON error: {err}"))
    }
}

impl From<String> for CmdCompleteError {
    fn from(msg: String) -> Self {
        CmdCompleteError::Generic(msg)
    }
}

impl From<&str> for CmdCompleteError {
    fn from(msg: &str) -> Self {
        CmdCompleteError::Generic(msg.to_owned())
    }
}
