use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

/// Warnings go to stderr; with a log dir, a timestamped file also gets `Info`.
/// Returns the log file path when one was created.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let mut log_path = None;
    if let Some(dir) = log_dir {
        create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let path = dir.join(log_file_name(Local::now()));
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Info, LogConfig::default(), file));
        log_path = Some(path);
    }

    CombinedLogger::init(loggers)?;
    Ok(log_path)
}

fn log_file_name(ts: DateTime<Local>) -> String {
    format!("consolidate_{}.log", ts.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn log_file_is_named_after_start_time() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log_file_name(ts), "consolidate_20240309_070501.log");
    }
}
