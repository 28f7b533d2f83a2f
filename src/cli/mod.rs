//! Command-line interface for unlockr
//!
//! This module provides the main CLI structure and command handling.
//! It uses clap for argument parsing and sets up logging from the global flags.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde_json::{Value, json};

pub mod commands;
mod output;

pub use output::{Output, group_digits};

/// unlockr - recover a lost password by exhaustive search
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search for the password of a target file
    Crack(commands::crack::CrackArgs),
    /// Show the size of a candidate space, or list its candidates
    Space(commands::space::SpaceArgs),
    /// Configuration management
    Config(commands::config::ConfigArgs),
    /// Show version information
    Version,
}

/// Options describing the candidate space, shared by `crack` and `space`
#[derive(Args, Debug, Clone, Default)]
pub struct SpaceOptions {
    /// Character set: a preset (digits, lower, upper, alpha, alnum, hex, symbols, printable)
    /// or the literal characters to use, in enumeration order. Preset names win; prefix
    /// with "literal:" to use the characters of a preset name, e.g. "literal:hex"
    #[arg(short = 's', long, value_name = "SET")]
    pub charset: Option<String>,

    /// Shortest candidate length
    #[arg(long, value_name = "N")]
    pub min: Option<usize>,

    /// Longest candidate length
    #[arg(long, value_name = "N")]
    pub max: Option<usize>,
}

impl SpaceOptions {
    /// Config overrides for the `search` section; absent flags become `null`.
    pub fn overrides(&self) -> Value {
        json!({
            "charset": self.charset,
            "min_length": self.min,
            "max_length": self.max,
        })
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        // Initialize output handler with global verbose and quiet settings
        let output = Output::new(self.verbose > 0, self.quiet);
        let config_path = self.config.as_deref();

        match self.command {
            Some(Commands::Crack(args)) => {
                commands::crack::execute(args, config_path, &output).await
            }
            Some(Commands::Space(args)) => {
                commands::space::execute(args, config_path, &output).await
            }
            Some(Commands::Config(args)) => {
                commands::config::execute(args, config_path, &output).await
            }
            Some(Commands::Version) => commands::version::execute(&output).await,
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

/// Default filter for a `-v` count. Per-length and progress lines show even without `-v`.
fn log_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,unlockr::search::generator=info,unlockr::search::progress=info",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_directives(verbose)));

    // Logs go to stderr so that stdout stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
