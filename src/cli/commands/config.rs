//! Configuration command implementations

use crate::cli::Output;
use crate::config::UnlockrConfig;
use crate::config::loader::{DEFAULT_CONFIG, PROJECT_CONFIG_STEM};
use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a commented unlockr.toml into the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Check that the merged configuration describes a valid search
    Validate,
    /// Print the merged configuration as TOML
    Show,
}

/// Execute config commands
pub async fn execute(args: ConfigArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    match args.command {
        ConfigCommands::Init { force } => init(force, output),
        ConfigCommands::Validate => validate(config_path, output),
        ConfigCommands::Show => show(config_path),
    }
}

fn init(force: bool, output: &Output) -> Result<()> {
    let config_path = PathBuf::from(format!("{PROJECT_CONFIG_STEM}.toml"));

    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    output.success("Configuration file created successfully");
    output.key_value("Config file:", &config_path.display().to_string(), false);
    Ok(())
}

fn validate(config_path: Option<&str>, output: &Output) -> Result<()> {
    let config = UnlockrConfig::load_with(config_path, None)?;
    let search = config
        .search_config()
        .context("Configuration is invalid")?;

    output.success("Configuration is valid");
    output.key_value("Alphabet:", &search.alphabet.to_string(), false);
    output.key_value(
        "Lengths:",
        &format!("{}-{}", search.min_length, search.max_length),
        false,
    );
    output.key_value("Workers:", &search.workers.to_string(), false);
    output.key_value("Queue capacity:", &search.queue_capacity.to_string(), false);
    Ok(())
}

fn show(config_path: Option<&str>) -> Result<()> {
    let config = UnlockrConfig::load_with(config_path, None)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
