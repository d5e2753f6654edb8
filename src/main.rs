//! cmdcomplete - shell completion resolver
//!
//! Resolves the valid next tokens of a partially typed command line against a
//! command model, and generates the shell hooks that call back into it.
//!
//! # Usage
//!
//! ```bash
//! # Candidates for a partial line
//! cmdcomplete --model todo.toml complete "add "
//!
//! # Register dynamic completion for `todo` in bash
//! source <(cmdcomplete completion bash --program todo)
//! ```

use clap::CommandFactory;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cmdcomplete::cli::{CliArgs, CliInterface};
use cmdcomplete::error::Result;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle subcommands, or print help when none is given
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    CliArgs::command().print_help()?;
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so it never mixes with completion candidates.
///
/// # Arguments
/// * `cli` - CLI interface with the effective logging settings
fn initialize_logging(cli: &CliInterface) {
    let level: Level = cli.config().logging.level.to_tracing_level();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
