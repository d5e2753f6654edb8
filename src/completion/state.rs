//! Completion state machine
//!
//! A completion run moves through a small set of states:
//!
//! ```text
//! AwaitingInput ──(empty request)─────────────────▶ RootCompletion
//!       │
//!       ├──(parse ok)─────────────────────────────▶ ParsedContext
//!       ├──(parse ok, no command matched)─────────▶ NoMatchFallback
//!       ├──(parse error, one token)───────────────▶ NoMatchFallback
//!       └──(parse error)──▶ PartialFallback ──(reparse ok)──▶ ParsedContext
//!                                  └──(reparse error)─────▶ NoMatchFallback
//! ```
//!
//! Transitions live in the engine, which owns the parser. Every terminal
//! state can produce a candidate list without failing.

use tracing::debug;

use super::resolver::ContextResolver;
use crate::model::CommandModel;
use crate::parser::ParseTree;

/// States of a single completion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionState<'m> {
    /// Initial state
    AwaitingInput,

    /// Nothing typed yet - offer every visible root command
    RootCompletion,

    /// The line parsed; candidates are the children of the context node
    ParsedContext {
        tree: ParseTree<'m>,
        /// Token naming the node whose children are offered
        context: String,
        /// Prefix the candidates must start with
        partial: String,
    },

    /// The full line did not parse; retry once without its last token
    PartialFallback {
        stripped: Vec<String>,
        partial: String,
    },

    /// No usable parse - root commands filtered by `partial`
    NoMatchFallback { partial: String },
}

impl<'m> CompletionState<'m> {
    /// Terminal states produce candidates; the rest need another step.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            CompletionState::AwaitingInput | CompletionState::PartialFallback { .. }
        )
    }

    /// Prefix filter carried by this state.
    pub fn partial(&self) -> &str {
        match self {
            CompletionState::AwaitingInput | CompletionState::RootCompletion => "",
            CompletionState::ParsedContext { partial, .. }
            | CompletionState::PartialFallback { partial, .. }
            | CompletionState::NoMatchFallback { partial } => partial,
        }
    }

    /// Produce the candidate list for this state.
    ///
    /// A context token the resolver cannot place degrades to the root
    /// command list, filtered the same way.
    pub fn candidates(&self, model: &CommandModel, resolver: &ContextResolver) -> Vec<String> {
        match self {
            CompletionState::ParsedContext {
                tree,
                context,
                partial,
            } => match resolver.find(tree, context) {
                Some(parent) => parent.child_candidates(partial),
                None => {
                    debug!(context = %context, "context not found in parse tree");
                    model.top_level_candidates(partial)
                }
            },
            other => model.top_level_candidates(other.partial()),
        }
    }
}
