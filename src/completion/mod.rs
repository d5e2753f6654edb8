//! Completion system
//!
//! Given a partially typed command line and a [`CommandModel`], produce the
//! list of valid next tokens.
//!
//! # Architecture
//!
//! - **CompletionRequest**: Tokenizes the raw request text
//! - **CompletionState**: Small state machine covering the parse, the
//!   strip-and-retry fallback and the top-level fallbacks
//! - **ContextResolver**: Finds the context command in a parse tree
//! - **CompletionEngine**: Orchestrates the entire completion flow
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use cmdcomplete::completion::CompletionEngine;
//! use cmdcomplete::model::{CommandDescriptor, CommandModel};
//!
//! let model = CommandModel::new(vec![
//!     CommandDescriptor::new("add"),
//!     CommandDescriptor::new("remove").hidden(true),
//!     CommandDescriptor::new("list"),
//! ])
//! .unwrap();
//! let engine = CompletionEngine::new(Arc::new(model));
//!
//! assert_eq!(engine.complete(Some("")), vec!["add", "list"]);
//! ```
//!
//! [`CommandModel`]: crate::model::CommandModel

mod engine;
mod request;
mod resolver;
mod state;

pub use engine::CompletionEngine;
pub use request::CompletionRequest;
pub use resolver::{ContextResolver, ContextSearch};
pub use state::CompletionState;
