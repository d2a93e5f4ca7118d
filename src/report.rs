use eyre::Result;
use std::io::Write;

use crate::pretty;
use crate::types::{RunSummary, ScanOutcome};

/// Receives completion events from the dispatcher, one at a time and in
/// completion order.
pub trait Report: Send + 'static {
    fn start(&mut self, total: usize) -> Result<()>;

    /// Called once per finished target with the updated progress count
    fn completed(&mut self, completed: usize, total: usize, outcome: &ScanOutcome) -> Result<()>;

    fn finish(&mut self, summary: &RunSummary) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text { color: bool },
    Json,
}

/// Writes result lines for positive findings and resolution failures, plus a
/// running progress counter in text mode.
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> Report for Reporter<W> {
    fn start(&mut self, total: usize) -> Result<()> {
        if let OutputFormat::Text { .. } = self.format {
            writeln!(self.out, "Scanning {} targets...", total)?;
            writeln!(self.out, "{}", pretty::format_progress(0, total))?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn completed(&mut self, completed: usize, total: usize, outcome: &ScanOutcome) -> Result<()> {
        match self.format {
            OutputFormat::Text { color } => {
                if outcome.is_reportable() {
                    writeln!(self.out, "\r{}", pretty::format_outcome(outcome, color))?;
                }
                write!(self.out, "\r{} ", pretty::format_progress(completed, total))?;
            }
            OutputFormat::Json => {
                if outcome.is_reportable() {
                    writeln!(self.out, "{}", pretty::format_json(outcome)?)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        if let OutputFormat::Text { .. } = self.format {
            writeln!(self.out)?;
            writeln!(self.out, "{}", pretty::format_summary(summary))?;
            self.out.flush()?;
        }
        Ok(())
    }
}
