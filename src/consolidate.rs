/*
cargo run --bin consolidate

cargo run --bin consolidate -- \
    --data-dir data \
    --log-dir  logs
*/

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use leads_consolidate::logging::init_logging;
use leads_consolidate::{ConsoleReporter, Consolidator};

// Merge every JSON file of the data folder into <data folder>/leads.json
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    // Folder holding the JSON files (default: data/ next to the executable)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    // Also write a timestamped log file into this folder
    #[arg(long)]
    log_dir: Option<PathBuf>,

    // Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_path) = init_logging(cli.log_dir.as_deref())? {
        info!("Logging to {}", log_path.display());
    }

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let consolidator = Consolidator::new(data_dir);
    let mut reporter = ConsoleReporter::stdout(!cli.quiet);

    match consolidator.run(&mut reporter) {
        Ok(summary) => {
            info!("Summary: {}", serde_json::to_string(&summary)?);
            Ok(())
        }
        // already printed as a notice
        Err(err) if err.is_nothing_to_do() => Ok(()),
        Err(err) => Err(err)
            .with_context(|| format!("consolidating {}", consolidator.data_dir().display())),
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("locating the executable")?;
    let base = exe.parent().context("executable has no parent folder")?;
    Ok(base.join("data"))
}
