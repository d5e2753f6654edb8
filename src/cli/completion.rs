//! Shell completion generation for cmdcomplete
//!
//! Two kinds of script are produced:
//! - a static clap_complete script for the `cmdcomplete` binary itself
//! - a dynamic hook for another program, which hands the current line to
//!   `cmdcomplete complete --with-program-name` on every completion request
//!
//! The hook runs in the user's shell, long after generation, so it carries
//! the model path (and config file, if any) as absolute, quoted arguments.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::completion::ContextSearch;
use crate::error::{CmdCompleteError, ConfigError, Result};

/// Binary name used in generated scripts
const BIN_NAME: &str = "cmdcomplete";

/// Arguments the generated hook passes back to cmdcomplete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookCommand {
    /// Command model the hook completes against
    pub model: Option<PathBuf>,
    /// Configuration file, when one was given explicitly
    pub config: Option<PathBuf>,
    pub context_search: Option<ContextSearch>,
    pub no_aliases: bool,
}

impl HookCommand {
    /// Render the `cmdcomplete ... complete --with-program-name --` prefix
    ///
    /// # Arguments
    /// * `shell` - Target shell, which decides the quoting rules
    ///
    /// # Returns
    /// * `Result<String>` - Command prefix, or an error when no model is set
    fn render(&self, shell: Shell) -> Result<String> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("model.path".to_string()))?;

        let mut parts = vec![BIN_NAME.to_string()];
        if let Some(config) = &self.config {
            parts.push("--config".to_string());
            parts.push(quote_path(shell, config)?);
        }
        parts.push("--model".to_string());
        parts.push(quote_path(shell, model)?);

        if let Some(search) = self.context_search {
            let name = match search {
                ContextSearch::Shallow => "shallow",
                ContextSearch::Recursive => "recursive",
            };
            parts.push(format!("--context-search {name}"));
        }
        if self.no_aliases {
            parts.push("--no-aliases".to_string());
        }

        parts.push("complete --with-program-name --".to_string());
        Ok(parts.join(" "))
    }
}

/// Generate a shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
/// * `program` - Program to register dynamic completion for; `None` yields
///   the static script for cmdcomplete itself
/// * `hook` - How the dynamic hook calls back into cmdcomplete
///
/// # Returns
/// * `Result<String>` - Script text or error
pub fn generate_completion(
    shell_name: &str,
    program: Option<&str>,
    hook: &HookCommand,
) -> Result<String> {
    let shell = parse_shell(shell_name)?;

    match program {
        Some(program) => dynamic_hook(shell, program, hook),
        None => Ok(static_script(shell)),
    }
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(CmdCompleteError::Generic(format!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish",
            shell_name
        ))),
    }
}

/// clap_complete script for the cmdcomplete binary
fn static_script(shell: Shell) -> String {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Hook registering dynamic completion for `program`
fn dynamic_hook(shell: Shell, program: &str, hook: &HookCommand) -> Result<String> {
    validate_program_name(program)?;
    let func = function_suffix(program);
    let invoke = hook.render(shell)?;

    let script = match shell {
        Shell::Bash => format!(
            r#"# Dynamic completion for {program}, served by {bin}
_{bin}_{func}() {{
    local IFS=$'\n'
    COMPREPLY=($({invoke} "${{COMP_LINE:0:$COMP_POINT}}" 2>/dev/null))
}}

complete -o default -F _{bin}_{func} {program}
"#,
            bin = BIN_NAME,
        ),
        Shell::Zsh => format!(
            r#"#compdef {program}
# Dynamic completion for {program}, served by {bin}
_{bin}_{func}() {{
    local -a candidates
    candidates=(${{(f)"$({invoke} "$LBUFFER" 2>/dev/null)"}})
    compadd -a candidates
}}

compdef _{bin}_{func} {program}
"#,
            bin = BIN_NAME,
        ),
        Shell::Fish => format!(
            r#"# Dynamic completion for {program}, served by {bin}
function __{bin}_{func}
    {invoke} (commandline -cp) 2>/dev/null
end

complete -c {program} -f -a "(__{bin}_{func})"
"#,
            bin = BIN_NAME,
        ),
        _ => {
            return Err(CmdCompleteError::Generic(
                "Unsupported shell. Supported shells: bash, zsh, fish".to_string(),
            ));
        }
    };

    Ok(script)
}

/// Program names end up unquoted in shell code.
fn validate_program_name(program: &str) -> Result<()> {
    let valid = !program.is_empty()
        && program
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(CmdCompleteError::Generic(format!(
            "Invalid program name for completion hook: '{}'",
            program
        )))
    }
}

/// Single-quote a path for the target shell.
fn quote_path(shell: Shell, path: &Path) -> Result<String> {
    let text = path.to_str().ok_or_else(|| {
        CmdCompleteError::Generic(format!("Path is not valid UTF-8: {}", path.display()))
    })?;

    let quoted = match shell {
        // fish honours \\ and \' inside single quotes
        Shell::Fish => text.replace('\\', "\\\\").replace('\'', "\\'"),
        _ => text.replace('\'', r"'\''"),
    };
    Ok(format!("'{quoted}'"))
}

fn function_suffix(program: &str) -> String {
    program
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
