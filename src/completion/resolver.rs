//! Context resolution
//!
//! Locates the command whose children become completion candidates, given
//! the parse tree of the typed line and the context token.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::CommandDescriptor;
use crate::parser::ParseTree;

/// How far the resolver looks for the context token.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContextSearch {
    /// Root node of the tree, then its direct children.
    ///
    /// Lines nested more than one level below the root fall back to the
    /// top-level command list.
    Shallow,

    /// Every node on the matched path, deepest first, each checked before
    /// its direct children.
    #[default]
    Recursive,
}

/// Finds the context node in a parse tree.
#[derive(Debug, Clone, Copy)]
pub struct ContextResolver {
    search: ContextSearch,
    match_aliases: bool,
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self::new(ContextSearch::default(), true)
    }
}

impl ContextResolver {
    pub fn new(search: ContextSearch, match_aliases: bool) -> Self {
        Self {
            search,
            match_aliases,
        }
    }

    pub fn search(&self) -> ContextSearch {
        self.search
    }

    pub fn match_aliases(&self) -> bool {
        self.match_aliases
    }

    /// Find the command named by `context` in `tree`.
    ///
    /// Returns `None` when nothing in the searched region matches; callers
    /// treat that the same as having no parse tree.
    pub fn find<'m>(&self, tree: &ParseTree<'m>, context: &str) -> Option<&'m CommandDescriptor> {
        match self.search {
            ContextSearch::Shallow => self.find_at(tree.command(), context),
            ContextSearch::Recursive => tree
                .path()
                .into_iter()
                .rev()
                .find_map(|node| self.find_at(node.command(), context)),
        }
    }

    /// The node itself, then its first matching direct child.
    fn find_at<'m>(
        &self,
        command: &'m CommandDescriptor,
        context: &str,
    ) -> Option<&'m CommandDescriptor> {
        if command.matches(context, self.match_aliases) {
            return Some(command);
        }
        command
            .children()
            .iter()
            .find(|child| child.matches(context, self.match_aliases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> CommandDescriptor {
        CommandDescriptor::new("a").child(
            CommandDescriptor::new("b")
                .alias("bee")
                .child(CommandDescriptor::new("c").child(CommandDescriptor::new("d"))),
        )
    }

    #[test]
    fn test_root_match() {
        let a = nested();
        let tree = ParseTree::new(&a);
        for search in [ContextSearch::Shallow, ContextSearch::Recursive] {
            let found = ContextResolver::new(search, true).find(&tree, "a");
            assert_eq!(found.map(|c| c.name()), Some("a"));
        }
    }

    #[test]
    fn test_direct_child_match() {
        let a = nested();
        let tree = ParseTree::new(&a);
        for search in [ContextSearch::Shallow, ContextSearch::Recursive] {
            let found = ContextResolver::new(search, true).find(&tree, "b");
            assert_eq!(found.map(|c| c.name()), Some("b"));
        }
    }

    #[test]
    fn test_shallow_stops_at_first_level() {
        let a = nested();
        let b = &a.children()[0];
        let c = &b.children()[0];
        let tree = ParseTree::new(&a).with_next(ParseTree::new(b).with_next(ParseTree::new(c)));

        let shallow = ContextResolver::new(ContextSearch::Shallow, true);
        assert!(shallow.find(&tree, "c").is_none());

        let recursive = ContextResolver::new(ContextSearch::Recursive, true);
        assert_eq!(recursive.find(&tree, "c").map(|c| c.name()), Some("c"));
        // child of the deepest matched node
        assert_eq!(recursive.find(&tree, "d").map(|c| c.name()), Some("d"));
    }

    #[test]
    fn test_recursive_does_not_search_off_path() {
        let a = nested();
        let tree = ParseTree::new(&a);
        let recursive = ContextResolver::new(ContextSearch::Recursive, true);
        assert!(recursive.find(&tree, "c").is_none());
    }

    #[test]
    fn test_alias_matching_is_optional() {
        let a = nested();
        let tree = ParseTree::new(&a);

        let with = ContextResolver::new(ContextSearch::Shallow, true);
        assert_eq!(with.find(&tree, "bee").map(|c| c.name()), Some("b"));

        let without = ContextResolver::new(ContextSearch::Shallow, false);
        assert!(without.find(&tree, "bee").is_none());
    }

    #[test]
    fn test_context_search_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            search: ContextSearch,
        }

        let w: Wrapper = toml::from_str("search = \"shallow\"").unwrap();
        assert_eq!(w.search, ContextSearch::Shallow);
        assert_eq!(ContextSearch::default(), ContextSearch::Recursive);
    }

    #[test]
    fn test_context_search_value_names() {
        assert_eq!(
            ContextSearch::from_str("recursive", false),
            Ok(ContextSearch::Recursive)
        );
        assert_eq!(
            ContextSearch::from_str("Shallow", true),
            Ok(ContextSearch::Shallow)
        );
        assert!(ContextSearch::from_str("deep", true).is_err());
    }
}
