//! Completion engine - orchestrates the completion flow
//!
//! Ties the request tokenizer, the grammar parser, the state machine and the
//! context resolver together. The engine never fails: every request,
//! however malformed, yields a (possibly empty) candidate list.

use std::sync::Arc;

use tracing::{debug, trace};

use super::request::{self, CompletionRequest};
use super::resolver::{ContextResolver, ContextSearch};
use super::state::CompletionState;
use crate::config::CompletionConfig;
use crate::model::CommandModel;
use crate::parser::{CommandTreeParser, GrammarParser, ParsedLine};

/// Main completion engine
pub struct CompletionEngine {
    /// Command tree being completed against
    model: Arc<CommandModel>,
    /// Grammar used to match typed tokens
    parser: Arc<dyn GrammarParser>,
    resolver: ContextResolver,
}

impl CompletionEngine {
    /// Create an engine using the default [`CommandTreeParser`]
    ///
    /// # Arguments
    /// * `model` - Validated command model
    pub fn new(model: Arc<CommandModel>) -> Self {
        Self::with_parser(model, Arc::new(CommandTreeParser::new()))
    }

    /// Create an engine with a custom grammar parser
    pub fn with_parser(model: Arc<CommandModel>, parser: Arc<dyn GrammarParser>) -> Self {
        Self {
            model,
            parser,
            resolver: ContextResolver::default(),
        }
    }

    /// Create an engine configured from the `[completion]` config section
    pub fn from_config(model: Arc<CommandModel>, config: &CompletionConfig) -> Self {
        Self::new(model)
            .with_context_search(config.context_search)
            .with_alias_matching(config.match_aliases)
    }

    pub fn with_context_search(mut self, search: ContextSearch) -> Self {
        self.resolver = ContextResolver::new(search, self.resolver.match_aliases());
        self
    }

    pub fn with_alias_matching(mut self, match_aliases: bool) -> Self {
        self.resolver = ContextResolver::new(self.resolver.search(), match_aliases);
        self
    }

    pub fn model(&self) -> &CommandModel {
        &self.model
    }

    /// Complete raw request text (everything after the program name)
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use cmdcomplete::completion::CompletionEngine;
    /// use cmdcomplete::model::{CommandDescriptor, CommandModel};
    ///
    /// let model = CommandModel::new(vec![
    ///     CommandDescriptor::new("add")
    ///         .child(CommandDescriptor::new("item"))
    ///         .child(CommandDescriptor::new("category")),
    ///     CommandDescriptor::new("list"),
    /// ])
    /// .unwrap();
    /// let engine = CompletionEngine::new(Arc::new(model));
    ///
    /// assert_eq!(engine.complete(Some("add ")), vec!["item", "category"]);
    /// assert_eq!(engine.complete(Some("add it")), vec!["item"]);
    /// ```
    pub fn complete(&self, input: Option<&str>) -> Vec<String> {
        self.complete_request(&CompletionRequest::parse(input))
    }

    pub fn complete_request(&self, request: &CompletionRequest) -> Vec<String> {
        self.resolve(request.tokens())
    }

    /// Resolve an already tokenized request
    pub fn resolve(&self, tokens: &[String]) -> Vec<String> {
        let state = self.run(tokens);
        let candidates = state.candidates(&self.model, &self.resolver);
        debug!(
            tokens = ?tokens,
            candidates = candidates.len(),
            "resolved completion request"
        );
        candidates
    }

    /// Drive the state machine to a terminal state
    pub fn run(&self, tokens: &[String]) -> CompletionState<'_> {
        let mut state = CompletionState::AwaitingInput;
        while !state.is_terminal() {
            state = self.step(state, tokens);
            trace!(state = ?state, "completion state");
        }
        state
    }

    fn step<'s>(&'s self, state: CompletionState<'s>, tokens: &[String]) -> CompletionState<'s> {
        match state {
            CompletionState::AwaitingInput => self.start(tokens),
            CompletionState::PartialFallback { stripped, partial } => {
                self.reparse(stripped, partial)
            }
            terminal => terminal,
        }
    }

    /// First parse attempt over the full token sequence
    fn start(&self, tokens: &[String]) -> CompletionState<'_> {
        if request::is_root(tokens) {
            return CompletionState::RootCompletion;
        }

        match self.parser.parse(&self.model, tokens) {
            Ok(ParsedLine {
                tree: Some(tree), ..
            }) => match context_token(tokens) {
                Some(context) => CompletionState::ParsedContext {
                    tree,
                    context: context.to_string(),
                    partial: String::new(),
                },
                None => CompletionState::RootCompletion,
            },
            Ok(_) => CompletionState::NoMatchFallback {
                partial: String::new(),
            },
            Err(err) => {
                debug!(error = %err, "parse failed, retrying without trailing token");
                match tokens.split_last() {
                    Some((last, rest)) if rest.is_empty() => CompletionState::NoMatchFallback {
                        partial: last.clone(),
                    },
                    Some((last, rest)) => CompletionState::PartialFallback {
                        stripped: rest.to_vec(),
                        partial: last.clone(),
                    },
                    None => CompletionState::RootCompletion,
                }
            }
        }
    }

    /// Single retry with the trailing token removed
    fn reparse(&self, stripped: Vec<String>, partial: String) -> CompletionState<'_> {
        match self.parser.parse(&self.model, &stripped) {
            Ok(ParsedLine {
                tree: Some(tree), ..
            }) => match stripped.last() {
                Some(context) => CompletionState::ParsedContext {
                    tree,
                    context: context.clone(),
                    partial,
                },
                None => CompletionState::NoMatchFallback { partial },
            },
            Ok(_) => CompletionState::NoMatchFallback { partial },
            Err(err) => {
                debug!(error = %err, "reparse failed, falling back to root commands");
                CompletionState::NoMatchFallback { partial }
            }
        }
    }
}

/// Last token, or the one before it when the line ends in a space
///
/// A line that parses is completed with an empty partial, even when its last
/// token is a half-typed positional value: `"list fo"` makes `fo` the context
/// token, which names no command, so the caller offers every root command
/// unfiltered. Only a parse failure turns the last token into a filter.
fn context_token(tokens: &[String]) -> Option<&str> {
    let last = tokens.last()?;
    if !last.is_empty() {
        return Some(last);
    }
    let idx = tokens.len().checked_sub(2)?;
    tokens.get(idx).map(String::as_str)
}
