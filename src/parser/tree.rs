//! Parse tree produced by a [`GrammarParser`](super::GrammarParser)

use crate::model::{CommandDescriptor, OptionDescriptor};

/// Option occurrence matched while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedOption<'m> {
    descriptor: &'m OptionDescriptor,
    value: Option<String>,
}

/// One matched command level and the sub-command matched below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree<'m> {
    command: &'m CommandDescriptor,
    arguments: Vec<String>,
    options: Vec<MatchedOption<'m>>,
    next: Option<Box<ParseTree<'m>>>,
}

/// Outcome of a successful parse.
///
/// `tree` is `None` when the line named no command at all, e.g. it held
/// only global options or only blank tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine<'m> {
    pub tree: Option<ParseTree<'m>>,
    pub global_options: Vec<MatchedOption<'m>>,
}

impl<'m> MatchedOption<'m> {
    pub fn new(descriptor: &'m OptionDescriptor, value: Option<String>) -> Self {
        Self { descriptor, value }
    }

    pub fn descriptor(&self) -> &'m OptionDescriptor {
        self.descriptor
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl<'m> ParseTree<'m> {
    /// Single node with nothing matched below it.
    pub fn new(command: &'m CommandDescriptor) -> Self {
        Self {
            command,
            arguments: Vec::new(),
            options: Vec::new(),
            next: None,
        }
    }

    /// Attach the sub-command node.
    pub fn with_next(mut self, next: ParseTree<'m>) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    pub fn command(&self) -> &'m CommandDescriptor {
        self.command
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn options(&self) -> &[MatchedOption<'m>] {
        &self.options
    }

    pub fn next(&self) -> Option<&ParseTree<'m>> {
        self.next.as_deref()
    }

    /// Nodes from this one down to the deepest matched sub-command.
    pub fn path(&self) -> Vec<&ParseTree<'m>> {
        let mut nodes = vec![self];
        let mut current = self;
        while let Some(next) = current.next() {
            nodes.push(next);
            current = next;
        }
        nodes
    }

    /// Deepest matched node.
    pub fn leaf(&self) -> &ParseTree<'m> {
        let mut current = self;
        while let Some(next) = current.next() {
            current = next;
        }
        current
    }

    pub(crate) fn push_argument(&mut self, value: String) {
        self.arguments.push(value);
    }

    pub(crate) fn push_option(&mut self, option: MatchedOption<'m>) {
        self.options.push(option);
    }

    /// Whether another positional value fits at this level.
    pub(crate) fn accepts_argument(&self) -> bool {
        let declared = self.command.arguments();
        self.arguments.len() < declared.len()
            || declared.last().is_some_and(|arg| arg.is_variadic())
    }

    pub(crate) fn set_next(&mut self, next: Option<ParseTree<'m>>) {
        self.next = next.map(Box::new);
    }
}
