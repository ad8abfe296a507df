use std::io::{self, Write};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::warn;

use crate::consolidator::Summary;
use crate::error::{ConsolidateError, FileParseError};

const RULE_WIDTH: usize = 40;

/// Receives the user-facing notices of a run.
///
/// A write error from any method stops the run.
pub trait Reporter {
    fn start(&mut self, _files: usize) -> io::Result<()> {
        Ok(())
    }
    fn file_ok(&mut self, name: &str) -> io::Result<()>;
    fn file_failed(&mut self, name: &str, err: &FileParseError) -> io::Result<()>;
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
    fn summary(&mut self, summary: &Summary) -> io::Result<()>;
    fn nothing_to_do(&mut self, err: &ConsolidateError) -> io::Result<()>;
}

/// Prints the `✓`/`✗` lines and the closing summary, with an optional
/// progress bar drawn on stdout while files are being read.
pub struct ConsoleReporter<W: Write> {
    out: W,
    progress: bool,
    bar: ProgressBar,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(progress: bool) -> Self {
        Self::new(io::stdout(), progress)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, progress: bool) -> Self {
        Self { out, progress, bar: ProgressBar::hidden() }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        let Self { out, bar, .. } = self;
        // keep the line clear of bar redraws
        bar.suspend(|| {
            writeln!(out, "{text}")?;
            out.flush()
        })
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn start(&mut self, files: usize) -> io::Result<()> {
        if !self.progress {
            return Ok(());
        }
        let bar = ProgressBar::with_draw_target(Some(files as u64), ProgressDrawTarget::stdout());
        match ProgressStyle::with_template("{spinner:.green} {pos}/{len} {wide_bar:.cyan/blue} {elapsed_precise}") {
            Ok(style) => bar.set_style(style),
            Err(e) => warn!("progress bar template rejected: {e}"),
        }
        self.bar = bar;
        Ok(())
    }

    fn file_ok(&mut self, name: &str) -> io::Result<()> {
        self.line(&format!("✓ {name}"))?;
        self.bar.inc(1);
        Ok(())
    }

    fn file_failed(&mut self, name: &str, err: &FileParseError) -> io::Result<()> {
        self.line(&format!("✗ {name}: {err}"))?;
        self.bar.inc(1);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.bar.finish_and_clear();
        Ok(())
    }

    fn summary(&mut self, summary: &Summary) -> io::Result<()> {
        writeln!(self.out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.out, "✅ Consolidated: {} leads", summary.records)?;
        writeln!(self.out, "📁 File: {}", summary.output.display())?;
        writeln!(self.out, "📊 Files read: {}", summary.files_read)?;
        self.out.flush()
    }

    fn nothing_to_do(&mut self, err: &ConsolidateError) -> io::Result<()> {
        writeln!(self.out, "❌ {err}")?;
        self.out.flush()
    }
}
