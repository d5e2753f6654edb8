//! Error handling for cmdcomplete.
//!
//! Errors only exist on the construction side of the crate: loading the
//! configuration, reading a model definition, and validating the command
//! tree. Completion resolution itself never fails; a line that cannot be
//! understood simply yields fewer (or zero) candidates.
//!
//! # Example
//!
//! ```rust
//! use cmdcomplete::error::{CmdCompleteError, ModelError, Result};
//!
//! fn check(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(ModelError::EmptyName { parent: "<root>".into() }.into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(check(""), Err(CmdCompleteError::Model(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CmdCompleteError, ConfigError, ModelError, ParseError, Result};
