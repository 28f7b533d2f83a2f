use crate::cli::{Output, SpaceOptions, group_digits};
use crate::config::UnlockrConfig;
use crate::search::CandidateGenerator;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::io::{BufWriter, Write};

#[derive(Args, Debug)]
pub struct SpaceArgs {
    #[command(flatten)]
    pub space: SpaceOptions,

    /// Print candidates in enumeration order instead of the summary
    #[arg(long)]
    pub list: bool,

    /// Maximum number of candidates to list (0 = all)
    #[arg(long, default_value = "100", value_name = "N")]
    pub limit: usize,
}

pub async fn execute(args: SpaceArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let overrides = json!({ "search": args.space.overrides() });
    let config = UnlockrConfig::load_with(config_path, Some(overrides))?;
    let search_config = config
        .search_config()
        .context("Invalid search configuration")?;

    if args.list {
        let limit = if args.limit == 0 { usize::MAX } else { args.limit };
        let stdout = std::io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        for candidate in CandidateGenerator::new(&search_config).sequence().take(limit) {
            writeln!(writer, "{candidate}")?;
        }
        writer.flush()?;
        return Ok(());
    }

    output.header("Candidate space");
    output.key_value("Alphabet:", &search_config.alphabet.to_string(), false);
    output.key_value("Alphabet size:", &search_config.alphabet.len().to_string(), false);
    for length in search_config.min_length..=search_config.max_length {
        let count = search_config
            .candidates_of_length(length)
            .map_or_else(|| "overflow".to_string(), group_digits);
        output.key_value(&format!("Length {length}:"), &count, false);
    }
    output.separator();
    output.key_value(
        "Total:",
        &search_config
            .space_size()
            .map_or_else(|| "more than 2^128".to_string(), group_digits),
        true,
    );

    Ok(())
}
