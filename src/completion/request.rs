//! Completion request normalization
//!
//! Turns the raw text a shell hands over into the ordered token sequence the
//! engine works on. Tokens are never empty, except for a single trailing
//! empty token that records "the user typed a space and has not started the
//! next word yet".

/// Tokenized completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRequest {
    tokens: Vec<String>,
}

impl CompletionRequest {
    /// Tokenize everything typed after the program name.
    ///
    /// # Arguments
    /// * `input` - Raw request text; `None` when the shell passed nothing
    ///
    /// # Examples
    /// ```
    /// use cmdcomplete::completion::CompletionRequest;
    ///
    /// let request = CompletionRequest::parse(Some("add "));
    /// assert_eq!(request.tokens(), ["add", ""]);
    /// assert!(CompletionRequest::parse(None).is_root());
    /// ```
    pub fn parse(input: Option<&str>) -> Self {
        Self {
            tokens: input.map(tokenize).unwrap_or_default(),
        }
    }

    /// Tokenize a whole command line, dropping the leading program name.
    pub fn from_command_line(line: Option<&str>) -> Self {
        let mut tokens = line.map(tokenize).unwrap_or_default();
        if !tokens.is_empty() {
            tokens.remove(0);
        }
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Nothing typed yet: the request is empty or a single empty token.
    pub fn is_root(&self) -> bool {
        is_root(&self.tokens)
    }
}

pub(crate) fn is_root(tokens: &[String]) -> bool {
    match tokens {
        [] => true,
        [only] => only.is_empty(),
        _ => false,
    }
}

fn tokenize(input: &str) -> Vec<String> {
    let trimmed = input.trim_start();
    let mut tokens: Vec<String> = trimmed.split_whitespace().map(String::from).collect();

    if trimmed.is_empty() || trimmed.ends_with(char::is_whitespace) {
        tokens.push(String::new());
    }

    tokens
}
