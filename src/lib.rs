//! cmdcomplete library
//!
//! Core of a shell-completion resolver: given a partially typed command line
//! and a static model of a program's command hierarchy, produce the list of
//! valid next tokens.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Tokenizer, state machine, context resolver and engine
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `model`: Command model and its TOML definition format
//! - `parser`: Grammar parser producing parse trees
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cmdcomplete::{CommandModel, CompletionEngine};
//!
//! let model = CommandModel::from_toml_str(
//!     r#"
//!     [[commands]]
//!     name = "add"
//!
//!     [[commands.commands]]
//!     name = "item"
//!
//!     [[commands.commands]]
//!     name = "category"
//!     "#,
//! )
//! .unwrap();
//!
//! let engine = CompletionEngine::new(Arc::new(model));
//! assert_eq!(engine.complete(Some("add ")), vec!["item", "category"]);
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;

// Re-export commonly used types
pub use completion::{CompletionEngine, CompletionRequest, ContextSearch};
pub use config::Config;
pub use error::{CmdCompleteError, Result};
pub use model::{CommandDescriptor, CommandModel};
pub use parser::{CommandTreeParser, GrammarParser};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
