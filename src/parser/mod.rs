//! Command-line grammar parser
//!
//! Matches a token sequence against a [`CommandModel`] and produces a
//! [`ParseTree`] describing the matched command path, or a [`ParseError`]
//! when the tokens do not fit the grammar.
//!
//! # Grammar
//!
//! Tokens are consumed left to right:
//! - blank tokens are skipped
//! - `--name`, `--name=value` and `-c` are options, looked up on the current
//!   command, its ancestors, then the global options
//! - `--` ends option parsing; everything after it is positional
//! - before any command, a token must name a root command (or alias)
//! - after a command, a token descends into a matching child, otherwise
//!   fills the next free positional argument
//!
//! Missing required arguments are accepted: the parser is used on lines that
//! are still being typed.

mod tree;

pub use tree::{MatchedOption, ParseTree, ParsedLine};

use crate::error::ParseError;
use crate::model::{CommandModel, OptionDescriptor};

/// Contract between the completion engine and a command-line grammar.
///
/// A failed match must be reported as a [`ParseError`]; the engine relies on
/// that signal to decide when to retry with the trailing token removed.
pub trait GrammarParser: Send + Sync {
    /// Parse `tokens` against `model`.
    fn parse<'m>(
        &self,
        model: &'m CommandModel,
        tokens: &[String],
    ) -> Result<ParsedLine<'m>, ParseError>;
}

/// Default grammar parser for [`CommandModel`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandTreeParser;

impl CommandTreeParser {
    pub fn new() -> Self {
        Self
    }
}

impl GrammarParser for CommandTreeParser {
    fn parse<'m>(
        &self,
        model: &'m CommandModel,
        tokens: &[String],
    ) -> Result<ParsedLine<'m>, ParseError> {
        let mut levels: Vec<ParseTree<'m>> = Vec::new();
        let mut global_options = Vec::new();
        let mut options_done = false;

        let mut tokens = tokens.iter().map(String::as_str).filter(|t| !t.is_empty());

        while let Some(token) = tokens.next() {
            if !options_done && token == "--" {
                options_done = true;
                continue;
            }

            if !options_done && is_option(token) {
                let (spelling, inline) = split_inline_value(token);
                let descriptor = lookup_option(model, &levels, spelling)
                    .ok_or_else(|| ParseError::UnknownOption(spelling.to_string()))?;

                let value = match (descriptor.takes_value(), inline) {
                    (true, Some(value)) => Some(value.to_string()),
                    (true, None) => match tokens.next() {
                        Some(value) => Some(value.to_string()),
                        None => return Err(ParseError::MissingOptionValue(spelling.to_string())),
                    },
                    (false, Some(_)) => {
                        return Err(ParseError::UnexpectedArgument(token.to_string()));
                    }
                    (false, None) => None,
                };

                let matched = MatchedOption::new(descriptor, value);
                match levels.last_mut() {
                    Some(level) => level.push_option(matched),
                    None => global_options.push(matched),
                }
                continue;
            }

            let Some(current) = levels.last().map(ParseTree::command) else {
                let command = model
                    .find_command(token)
                    .ok_or_else(|| ParseError::UnknownCommand(token.to_string()))?;
                levels.push(ParseTree::new(command));
                continue;
            };

            if let Some(child) = current.find_child(token) {
                levels.push(ParseTree::new(child));
                continue;
            }

            match levels.last_mut() {
                Some(level) if level.accepts_argument() => level.push_argument(token.to_string()),
                _ if current.is_branch() => {
                    return Err(ParseError::UnknownCommand(token.to_string()));
                }
                _ => return Err(ParseError::UnexpectedArgument(token.to_string())),
            }
        }

        let tree = levels.into_iter().rev().fold(None, |next, mut node| {
            node.set_next(next);
            Some(node)
        });

        Ok(ParsedLine {
            tree,
            global_options,
        })
    }
}

fn is_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Split `--name=value` into its spelling and inline value.
fn split_inline_value(token: &str) -> (&str, Option<&str>) {
    if token.starts_with("--") {
        if let Some((name, value)) = token.split_once('=') {
            return (name, Some(value));
        }
    }
    (token, None)
}

/// Innermost command wins; global options are accepted anywhere.
fn lookup_option<'m>(
    model: &'m CommandModel,
    levels: &[ParseTree<'m>],
    spelling: &str,
) -> Option<&'m OptionDescriptor> {
    levels
        .iter()
        .rev()
        .find_map(|level| level.command().find_option(spelling))
        .or_else(|| model.find_global_option(spelling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArgumentDescriptor, CommandDescriptor};

    fn model() -> CommandModel {
        CommandModel::with_global_options(
            vec![
                CommandDescriptor::new("add")
                    .child(
                        CommandDescriptor::new("item")
                            .alias("it")
                            .argument(ArgumentDescriptor::required("name"))
                            .option(OptionDescriptor::flag("force").short('f'))
                            .option(OptionDescriptor::value("tag").short('t')),
                    )
                    .child(CommandDescriptor::new("category")),
                CommandDescriptor::new("remove")
                    .hidden(true)
                    .argument(ArgumentDescriptor::required("paths").variadic()),
                CommandDescriptor::new("list"),
            ],
            vec![OptionDescriptor::flag("verbose").short('v')],
        )
        .unwrap()
    }

    fn tokens(line: &str) -> Vec<String> {
        line.split(' ').map(String::from).collect()
    }

    fn path_names(line: &ParsedLine<'_>) -> Vec<String> {
        line.tree
            .as_ref()
            .map(|t| t.path().iter().map(|n| n.command().name().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_parse_nested_commands() {
        let model = model();
        let parsed = CommandTreeParser.parse(&model, &tokens("add item")).unwrap();
        assert_eq!(path_names(&parsed), vec!["add", "item"]);
    }

    #[test]
    fn test_parse_alias() {
        let model = model();
        let parsed = CommandTreeParser.parse(&model, &tokens("add it")).unwrap();
        assert_eq!(path_names(&parsed), vec!["add", "item"]);
    }

    #[test]
    fn test_trailing_blank_token_is_ignored() {
        let model = model();
        let parsed = CommandTreeParser.parse(&model, &tokens("add ")).unwrap();
        assert_eq!(path_names(&parsed), vec!["add"]);
    }

    #[test]
    fn test_unknown_child_of_branch() {
        let model = model();
        let err = CommandTreeParser.parse(&model, &tokens("add ite")).unwrap_err();
        assert_eq!(err, ParseError::UnknownCommand("ite".to_string()));
    }

    #[test]
    fn test_unknown_root_command() {
        let model = model();
        let err = CommandTreeParser.parse(&model, &tokens("ad")).unwrap_err();
        assert_eq!(err, ParseError::UnknownCommand("ad".to_string()));
    }

    #[test]
    fn test_positional_arguments() {
        let model = model();
        let parsed = CommandTreeParser
            .parse(&model, &tokens("add item widget"))
            .unwrap();
        let leaf = parsed.tree.as_ref().unwrap().leaf();
        assert_eq!(leaf.arguments(), ["widget".to_string()]);

        let err = CommandTreeParser
            .parse(&model, &tokens("add item widget extra"))
            .unwrap_err();
        assert_eq!(err, ParseError::UnexpectedArgument("extra".to_string()));
    }

    #[test]
    fn test_variadic_arguments() {
        let model = model();
        let parsed = CommandTreeParser
            .parse(&model, &tokens("remove a b c"))
            .unwrap();
        assert_eq!(parsed.tree.unwrap().arguments().len(), 3);
    }

    #[test]
    fn test_options() {
        let model = model();
        let parsed = CommandTreeParser
            .parse(&model, &tokens("add item -f --tag red widget"))
            .unwrap();
        let leaf = parsed.tree.as_ref().unwrap().leaf();
        assert_eq!(leaf.options().len(), 2);
        assert_eq!(leaf.options()[1].value(), Some("red"));
        assert_eq!(leaf.arguments(), ["widget".to_string()]);

        let parsed = CommandTreeParser
            .parse(&model, &tokens("add item --tag=blue"))
            .unwrap();
        let leaf = parsed.tree.as_ref().unwrap().leaf();
        assert_eq!(leaf.options()[0].value(), Some("blue"));
    }

    #[test]
    fn test_option_errors() {
        let model = model();
        assert_eq!(
            CommandTreeParser
                .parse(&model, &tokens("add item --nope"))
                .unwrap_err(),
            ParseError::UnknownOption("--nope".to_string())
        );
        assert_eq!(
            CommandTreeParser
                .parse(&model, &tokens("add item --tag"))
                .unwrap_err(),
            ParseError::MissingOptionValue("--tag".to_string())
        );
        assert_eq!(
            CommandTreeParser
                .parse(&model, &tokens("add item --force=yes"))
                .unwrap_err(),
            ParseError::UnexpectedArgument("--force=yes".to_string())
        );
    }

    #[test]
    fn test_global_options() {
        let model = model();
        let parsed = CommandTreeParser.parse(&model, &tokens("-v")).unwrap();
        assert!(parsed.tree.is_none());
        assert_eq!(parsed.global_options.len(), 1);

        // accepted below a command too
        let parsed = CommandTreeParser
            .parse(&model, &tokens("add --verbose item"))
            .unwrap();
        assert_eq!(path_names(&parsed), vec!["add", "item"]);
    }

    #[test]
    fn test_double_dash_ends_options() {
        let model = model();
        let parsed = CommandTreeParser
            .parse(&model, &tokens("add item -- -f"))
            .unwrap();
        let leaf = parsed.tree.as_ref().unwrap().leaf();
        assert_eq!(leaf.arguments(), ["-f".to_string()]);
        assert!(leaf.options().is_empty());
    }

    #[test]
    fn test_empty_tokens_yield_no_tree() {
        let model = model();
        let parsed = CommandTreeParser.parse(&model, &[]).unwrap();
        assert!(parsed.tree.is_none());
    }
}
