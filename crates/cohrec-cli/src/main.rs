//! Decode a replay header and print it.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cohrec_ucs::UcsTable;

/// Decode the header of a Company of Heroes replay file.
#[derive(Parser)]
#[command(name = "cohrec", version, about)]
struct Cli {
    /// Replay file (.rec) to decode.
    replay: PathBuf,

    /// RelicCOH .ucs locale table used to resolve the map name and
    /// description codes.
    #[arg(long, value_name = "PATH")]
    ucs: Option<PathBuf>,

    /// Print the record as JSON instead of a text summary.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let data = fs::read(&cli.replay)
        .with_context(|| format!("failed to read {}", cli.replay.display()))?;
    let mut header = cohrec::decode(&data);

    if let Some(path) = &cli.ucs {
        let table = UcsTable::load(path)
            .with_context(|| format!("failed to load UCS table {}", path.display()))?;
        header.resolve_map_text(&table);
    }

    if !header.success {
        log::warn!("header only partially decoded; some fields may be missing");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&header)?);
    } else {
        print!("{header}");
    }
    Ok(())
}
