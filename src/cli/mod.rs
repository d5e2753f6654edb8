//! Command-line interface for cmdcomplete
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Command model loading
//! - Subcommand dispatch (complete, completion, model, config, version)

pub mod completion;

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::completion::{CompletionEngine, CompletionRequest, ContextSearch};
use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::model::CommandModel;

use self::completion::HookCommand;

/// cmdcomplete - shell completion resolver
#[derive(Parser, Debug)]
#[command(
    name = "cmdcomplete",
    version,
    about = "Shell completion resolver driven by a command model",
    long_about = "Resolves the valid next tokens of a partially typed command line against a
TOML-described command tree, and generates shell hooks that use it."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Command model file (TOML)
    #[arg(short = 'm', long = "model", value_name = "FILE")]
    pub model_file: Option<PathBuf>,

    /// Context search policy
    #[arg(long, value_enum, ignore_case = true, value_name = "POLICY")]
    pub context_search: Option<ContextSearch>,

    /// Only match primary names when locating the context command
    #[arg(long = "no-aliases")]
    pub no_aliases: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for cmdcomplete
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print completion candidates for a partial command line
    Complete {
        /// Partial command line; omitted means nothing typed yet
        #[arg(value_name = "LINE")]
        line: Option<String>,

        /// The line starts with the program name (as passed by shell hooks)
        #[arg(long)]
        with_program_name: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Lines)]
        format: OutputFormat,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,

        /// Emit a dynamic completion hook for this program instead
        #[arg(long, value_name = "NAME")]
        program: Option<String>,
    },

    /// Inspect the command model
    Model {
        /// Print the visible command tree
        #[arg(long)]
        show: bool,

        /// Validate the model file
        #[arg(long)]
        validate: bool,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Show version information
    Version,
}

/// Candidate output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One candidate per line
    Lines,
    /// JSON array
    Json,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with environment and arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;
        config.validate()?;

        config.apply_env();
        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    ///
    /// # Returns
    /// * `&Config` - Reference to configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    ///
    /// # Returns
    /// * `&CliArgs` - Reference to arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    ///
    /// # Arguments
    /// * `config` - Configuration to modify
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_model_args(config, args);
        Self::apply_completion_args(config, args);
        Self::apply_logging_args(config, args);
    }

    /// Apply model-related CLI arguments to configuration
    fn apply_model_args(config: &mut Config, args: &CliArgs) {
        if let Some(path) = &args.model_file {
            config.model.path = Some(path.clone());
        }
    }

    /// Apply completion-related CLI arguments to configuration
    fn apply_completion_args(config: &mut Config, args: &CliArgs) {
        if let Some(search) = args.context_search {
            config.completion.context_search = search;
        }

        if args.no_aliases {
            config.completion.match_aliases = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Load the command model named by the configuration
    ///
    /// # Returns
    /// * `Result<Arc<CommandModel>>` - Validated model or error
    pub fn load_model(&self) -> Result<Arc<CommandModel>> {
        let path = self.config.model_path()?;
        let model = CommandModel::load(path)?;
        tracing::debug!(
            path = %path.display(),
            commands = model.commands().len(),
            "command model loaded"
        );
        Ok(Arc::new(model))
    }

    /// Arguments for the dynamic hook, with paths made absolute
    ///
    /// The hook runs from whatever directory the user completes in, so
    /// relative paths are resolved against the current directory now.
    fn hook_command(&self) -> Result<HookCommand> {
        Ok(HookCommand {
            model: self
                .config
                .model
                .path
                .as_deref()
                .map(std::path::absolute)
                .transpose()?,
            config: self
                .args
                .config_file
                .as_deref()
                .map(std::path::absolute)
                .transpose()?,
            context_search: self.args.context_search,
            no_aliases: self.args.no_aliases,
        })
    }

    /// Handle subcommands, writing their output to stdout
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false otherwise
    pub fn handle_subcommand(&self) -> Result<bool> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let handled = self.handle_subcommand_with(&mut out)?;
        out.flush()?;
        Ok(handled)
    }

    /// Handle subcommands
    ///
    /// `complete` and `completion` write to `out`; the inspection
    /// subcommands print directly.
    ///
    /// # Arguments
    /// * `out` - Destination for candidates and generated scripts
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false otherwise
    pub fn handle_subcommand_with<W: Write>(&self, out: &mut W) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Complete {
                line,
                with_program_name,
                format,
            }) => {
                self.run_completion(out, line.as_deref(), *with_program_name, *format)?;
                Ok(true)
            }
            Some(Commands::Completion { shell, program }) => {
                let hook = self.hook_command()?;
                let script = completion::generate_completion(shell, program.as_deref(), &hook)?;
                write!(out, "{}", script)?;
                Ok(true)
            }
            Some(Commands::Model { show, validate }) => {
                self.handle_model_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve and print completion candidates
    ///
    /// Only model loading can fail here; the resolution itself always
    /// produces a (possibly empty) list.
    fn run_completion<W: Write>(
        &self,
        out: &mut W,
        line: Option<&str>,
        with_program_name: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let model = self.load_model()?;
        let engine = CompletionEngine::from_config(model, &self.config.completion);

        let request = if with_program_name {
            CompletionRequest::from_command_line(line)
        } else {
            CompletionRequest::parse(line)
        };
        let candidates = engine.complete_request(&request);
        write_candidates(out, &candidates, format)
    }

    /// Handle model subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to print the command tree
    /// * `validate` - Whether to validate the model file
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_model_command(&self, show: bool, validate: bool) -> Result<()> {
        let model = self.load_model()?;

        if validate {
            println!(
                "✅ Command model is valid ({} top-level commands)",
                model.commands().len()
            );
        }

        if show || !validate {
            print!("{}", model);
        }

        Ok(())
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Show version information
    fn show_version(&self) {
        println!("cmdcomplete version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }
}

/// Write candidates in the requested format
///
/// # Arguments
/// * `out` - Destination writer
/// * `candidates` - Candidates in engine order
/// * `format` - Output format
fn write_candidates<W: Write>(
    out: &mut W,
    candidates: &[String],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Lines => {
            for candidate in candidates {
                writeln!(out, "{}", candidate)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, candidates)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CmdCompleteError, ConfigError};
    use std::fs;
    use std::path::Path;

    const MODEL: &str = r#"
[[commands]]
name = "add"

  [[commands.commands]]
  name = "item"
  arguments = [{ name = "name", required = true }]
  options = [{ long = "tag", takes_value = true }]

  [[commands.commands]]
  name = "category"

[[commands]]
name = "remove"
hidden = true

[[commands]]
name = "list"
"#;

    /// Write a model and an empty config into `dir`, then parse `extra`
    /// after `-c <config> -m <model>`.
    fn interface(dir: &Path, extra: &[&str]) -> CliInterface {
        let model = dir.join("model.toml");
        let config = dir.join("config.toml");
        fs::write(&model, MODEL).unwrap();
        fs::write(&config, "").unwrap();

        let mut argv = vec![
            "cmdcomplete".to_string(),
            "-c".to_string(),
            config.display().to_string(),
            "-m".to_string(),
            model.display().to_string(),
        ];
        argv.extend(extra.iter().map(|a| a.to_string()));
        CliInterface::from_args(CliArgs::try_parse_from(argv).unwrap()).unwrap()
    }

    fn run(cli: &CliInterface) -> String {
        let mut out = Vec::new();
        assert!(cli.handle_subcommand_with(&mut out).unwrap());
        String::from_utf8(out).unwrap()
    }

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = args(&["cmdcomplete"]);
        assert!(args.command.is_none());
        assert!(!args.verbose);
        assert!(args.model_file.is_none());
    }

    #[test]
    fn test_complete_subcommand() {
        let parsed = args(&["cmdcomplete", "-m", "model.toml", "complete", "add it"]);
        assert_eq!(parsed.model_file, Some(PathBuf::from("model.toml")));
        match parsed.command {
            Some(Commands::Complete {
                line,
                with_program_name,
                format,
            }) => {
                assert_eq!(line.as_deref(), Some("add it"));
                assert!(!with_program_name);
                assert_eq!(format, OutputFormat::Lines);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_complete_without_line() {
        let parsed = args(&["cmdcomplete", "complete", "--format", "json"]);
        match parsed.command {
            Some(Commands::Complete { line, format, .. }) => {
                assert!(line.is_none());
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_complete_line_after_separator() {
        let parsed = args(&[
            "cmdcomplete",
            "complete",
            "--with-program-name",
            "--",
            "todo add --due ",
        ]);
        match parsed.command {
            Some(Commands::Complete {
                line,
                with_program_name,
                ..
            }) => {
                assert_eq!(line.as_deref(), Some("todo add --due "));
                assert!(with_program_name);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_completion_subcommand() {
        let parsed = args(&["cmdcomplete", "completion", "zsh", "--program", "todo"]);
        match parsed.command {
            Some(Commands::Completion { shell, program }) => {
                assert_eq!(shell, "zsh");
                assert_eq!(program.as_deref(), Some("todo"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_apply_args_to_config() {
        let parsed = args(&[
            "cmdcomplete",
            "--model",
            "cli.toml",
            "--context-search",
            "SHALLOW",
            "--no-aliases",
            "-v",
        ]);
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &parsed);

        assert_eq!(config.model.path, Some(PathBuf::from("cli.toml")));
        assert_eq!(config.completion.context_search, ContextSearch::Shallow);
        assert!(!config.completion.match_aliases);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_model_overrides_env() {
        let parsed = args(&["cmdcomplete", "-m", "cli.toml"]);
        let mut config = Config::default();
        config.apply_env_with(|_| Some("env.toml".to_string()));
        CliInterface::apply_args_to_config(&mut config, &parsed);
        assert_eq!(config.model.path, Some(PathBuf::from("cli.toml")));
    }

    #[test]
    fn test_logging_flag_priority() {
        let mut config = Config::default();
        CliInterface::apply_logging_args(&mut config, &args(&["cmdcomplete", "-q", "--vv"]));
        assert_eq!(config.logging.level, LogLevel::Trace);

        let mut config = Config::default();
        CliInterface::apply_logging_args(&mut config, &args(&["cmdcomplete", "-q"]));
        assert_eq!(config.logging.level, LogLevel::Error);

        let mut config = Config::default();
        CliInterface::apply_logging_args(&mut config, &args(&["cmdcomplete"]));
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_context_search() {
        assert!(CliArgs::try_parse_from(["cmdcomplete", "--context-search", "deep"]).is_err());
        let parsed = args(&["cmdcomplete", "--context-search", "Recursive"]);
        assert_eq!(parsed.context_search, Some(ContextSearch::Recursive));
    }

    #[test]
    fn test_complete_prints_candidates() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run(&interface(dir.path(), &["complete"])), "add\nlist\n");
        assert_eq!(
            run(&interface(dir.path(), &["complete", "add "])),
            "item\ncategory\n"
        );
        assert_eq!(
            run(&interface(
                dir.path(),
                &["complete", "--with-program-name", "--", "todo add c"]
            )),
            "category\n"
        );
    }

    #[test]
    fn test_complete_malformed_lines_succeed() {
        let dir = tempfile::tempdir().unwrap();
        // both parse attempts fail; nothing at the root starts with "it"
        assert_eq!(run(&interface(dir.path(), &["complete", "bogus it"])), "");
        // missing option value; item has no sub-commands to offer
        assert_eq!(
            run(&interface(dir.path(), &["complete", "--", "add item --tag"])),
            ""
        );
        assert_eq!(
            run(&interface(dir.path(), &["complete", "--format", "json", "bogus it"])),
            "[]\n"
        );
    }

    #[test]
    fn test_complete_without_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        let missing = dir.path().join("missing.toml");
        let argv = [
            "cmdcomplete",
            "-c",
            config.to_str().unwrap(),
            "-m",
            missing.to_str().unwrap(),
            "complete",
            "add ",
        ];
        let cli = CliInterface::from_args(CliArgs::try_parse_from(argv).unwrap()).unwrap();

        let mut out = Vec::new();
        let err = cli.handle_subcommand_with(&mut out).unwrap_err();
        assert!(matches!(
            err,
            CmdCompleteError::Config(ConfigError::FileNotFound(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_completion_hook_embeds_model_path() {
        let dir = tempfile::tempdir().unwrap();
        let cli = interface(
            dir.path(),
            &["--no-aliases", "completion", "bash", "--program", "todo"],
        );
        let script = run(&cli);

        let model = dir.path().join("model.toml");
        let config = dir.path().join("config.toml");
        assert!(script.contains(&format!("--model '{}'", model.display())));
        assert!(script.contains(&format!("--config '{}'", config.display())));
        assert!(script.contains("--no-aliases complete --with-program-name --"));
    }

    #[test]
    fn test_hook_command_absolutizes_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        let argv = [
            "cmdcomplete",
            "-c",
            config.to_str().unwrap(),
            "-m",
            "relative/model.toml",
        ];
        let cli = CliInterface::from_args(CliArgs::try_parse_from(argv).unwrap()).unwrap();

        let hook = cli.hook_command().unwrap();
        let model = hook.model.unwrap();
        assert!(model.is_absolute());
        assert!(model.ends_with("relative/model.toml"));
        assert_eq!(hook.config, Some(config));
    }

    #[test]
    fn test_write_candidates_lines() {
        let mut out = Vec::new();
        let candidates = vec!["item".to_string(), "category".to_string()];
        write_candidates(&mut out, &candidates, OutputFormat::Lines).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "item\ncategory\n");
    }

    #[test]
    fn test_write_candidates_json() {
        let mut out = Vec::new();
        let candidates = vec!["item".to_string()];
        write_candidates(&mut out, &candidates, OutputFormat::Json).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\"item\"]\n");

        let mut out = Vec::new();
        write_candidates(&mut out, &[], OutputFormat::Json).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn test_write_candidates_empty_lines() {
        let mut out = Vec::new();
        write_candidates(&mut out, &[], OutputFormat::Lines).unwrap();
        assert!(out.is_empty());
    }
}
