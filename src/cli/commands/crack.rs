//! Crack command implementation
//!
//! Loads the target, binds a validator to it and runs the search engine on a
//! blocking thread while the async side listens for Ctrl-C.

use crate::cli::{Output, SpaceOptions, group_digits};
use crate::config::{UnlockrConfig, ValidatorKind};
use crate::search::{
    CancellationToken, SearchCoordinator, SearchError, SearchOutcome, SearchResult,
};
use crate::validate::{CommandValidator, DigestValidator, Payload, Validator};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct CrackArgs {
    /// Target file: a hex SHA-256 digest, or the locked document for --validator command
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// How candidates are checked against the target
    #[arg(long, value_enum)]
    pub validator: Option<ValidatorKind>,

    /// Program template for --validator command, e.g. "qpdf --password={password} --check {file}"
    #[arg(long, value_name = "TEMPLATE")]
    pub command: Option<String>,

    #[command(flatten)]
    pub space: SpaceOptions,

    /// Number of worker threads
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Candidates buffered between the generator and the workers
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Progress update interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Exit status after Ctrl-C, as shells report SIGINT
const INTERRUPTED: i32 = 130;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON format
    Json,
}

pub async fn execute(args: CrackArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let mut search_overrides = args.space.overrides();
    search_overrides["workers"] = json!(args.workers);
    search_overrides["queue_capacity"] = json!(args.queue_capacity);

    let overrides = json!({
        "search": search_overrides,
        "progress": {
            "interval_ms": args.interval_ms,
            "enabled": args.no_progress.then_some(false),
        },
        "validator": {
            "kind": args.validator,
            "command": args.command,
        },
    });

    let config = UnlockrConfig::load_with(config_path, Some(overrides))?;
    let search_config = config
        .search_config()
        .context("Invalid search configuration")?;

    // The target must be readable before anything starts
    let payload = Payload::load(&args.file)?;
    let validator: Arc<dyn Validator> = match config.validator.kind {
        ValidatorKind::Digest => Arc::new(DigestValidator::from_payload(&payload)?),
        ValidatorKind::Command => {
            Arc::new(CommandValidator::new(&config.validator.command, &payload)?)
        }
    };

    let text = args.format == OutputFormat::Text;
    if text {
        output.header("🔓 unlockr");
        output.key_value("Target:", &payload.path().display().to_string(), false);
        let kind = format!("{:?}", config.validator.kind).to_lowercase();
        output.key_value("Validator:", &kind, false);
        output.key_value("Alphabet:", &search_config.alphabet.to_string(), false);
        output.key_value(
            "Lengths:",
            &format!("{}-{}", search_config.min_length, search_config.max_length),
            false,
        );
        output.key_value(
            "Candidates:",
            &search_config
                .space_size()
                .map_or_else(|| "more than 2^128".to_string(), group_digits),
            false,
        );
        output.key_value("Workers:", &search_config.workers.to_string(), false);
        output.separator();
    }

    let mut coordinator = SearchCoordinator::with_shared(search_config, validator)?;
    let spinner = if text && config.progress.enabled {
        Some(output.spinner("Working..."))
    } else {
        None
    };
    if let Some(spinner) = spinner.clone() {
        coordinator = coordinator.with_progress(move |snapshot| {
            spinner.set_message(format!(
                "Working... length {} | {} tested | {:.0}/s",
                snapshot.counts.current_length,
                group_digits(snapshot.counts.tested),
                snapshot.rate()
            ));
        });
    } else if !config.progress.enabled {
        coordinator = coordinator.with_progress(|_| {});
    }

    let token = CancellationToken::new();
    let mut search = tokio::task::spawn_blocking({
        let token = token.clone();
        move || coordinator.run_with_token(token)
    });

    let outcome = tokio::select! {
        joined = &mut search => joined.context("Search thread failed")?,
        _ = tokio::signal::ctrl_c() => {
            token.cancel();
            output.warning("Interrupted, waiting for workers to stop...");
            search.await.context("Search thread failed")?
        }
    };

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let code = finish(outcome, args.format, output)?;
    if code != 0 {
        // Exhausting the space is not an error, but scripts need a failing status
        std::process::exit(code);
    }
    Ok(())
}

/// Report the search and pick the process exit code.
fn finish(
    outcome: Result<SearchOutcome, SearchError>,
    format: OutputFormat,
    output: &Output,
) -> Result<i32> {
    match outcome {
        Ok(outcome) => {
            report(&outcome, format, output)?;
            Ok(if outcome.result.is_found() { 0 } else { 1 })
        }
        Err(SearchError::Cancelled) => {
            output.error("Search interrupted before a password was found");
            Ok(INTERRUPTED)
        }
        Err(e) => Err(e.into()),
    }
}

fn report(outcome: &SearchOutcome, format: OutputFormat, output: &Output) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let total_time = format!("{:.2} seconds", outcome.result.elapsed().as_secs_f64());
    match &outcome.result {
        SearchResult::Found { password, .. } => {
            output.success("🎉 Password found!");
            output.key_value("Password:", password, true);
        }
        SearchResult::Exhausted { .. } => {
            output.warning("Search finished. Password not found within the given constraints.");
        }
    }
    output.key_value("Total time:", &total_time, false);
    output.key_value("Tested:", &group_digits(outcome.stats.tested), false);
    if outcome.stats.validation_errors > 0 {
        output.key_value(
            "Check errors:",
            &group_digits(outcome.stats.validation_errors),
            false,
        );
    }
    output.verbose(&format!("Per-worker candidates: {:?}", outcome.stats.per_worker));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchStats;
    use std::time::Duration;

    fn outcome(result: SearchResult) -> Result<SearchOutcome, SearchError> {
        Ok(SearchOutcome {
            result,
            stats: SearchStats::default(),
        })
    }

    #[test]
    fn test_exit_codes() {
        let output = Output::new(false, true);
        let found = outcome(SearchResult::Found {
            password: "4711".to_string(),
            elapsed: Duration::from_millis(5),
        });
        let exhausted = outcome(SearchResult::Exhausted {
            elapsed: Duration::from_millis(5),
        });

        assert_eq!(finish(found, OutputFormat::Text, &output).unwrap(), 0);
        assert_eq!(finish(exhausted, OutputFormat::Text, &output).unwrap(), 1);
        assert_eq!(
            finish(Err(SearchError::Cancelled), OutputFormat::Text, &output).unwrap(),
            INTERRUPTED
        );
        assert!(finish(Err(SearchError::WorkerPanicked), OutputFormat::Json, &output).is_err());
    }
}
