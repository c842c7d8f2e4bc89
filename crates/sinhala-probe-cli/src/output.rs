//! Output formatting and progress reporting

use crate::error::CliResult;
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use sinhala_probe::{CaseReport, Sample};
use std::fmt::Write as _;
use std::time::Duration;

/// Output format for listings and results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

impl From<crate::commands::FormatArg> for OutputFormat {
    fn from(arg: crate::commands::FormatArg) -> Self {
        match arg {
            crate::commands::FormatArg::Text => Self::Text,
            crate::commands::FormatArg::Json => Self::Json,
        }
    }
}

/// One row of `list --format json`
#[derive(Debug, Serialize)]
struct CaseRow<'a> {
    id: &'a str,
    suite: Option<&'static str>,
    title: &'a str,
    check: sinhala_probe::Check,
    length: String,
    authored_length: String,
    input: &'a str,
    expected: &'a str,
}

/// Render a case listing
pub fn render_cases<'a>(
    samples: impl IntoIterator<Item = &'a Sample>,
    format: OutputFormat,
) -> CliResult<String> {
    let samples: Vec<&Sample> = samples.into_iter().collect();
    match format {
        OutputFormat::Json => {
            let rows: Vec<CaseRow<'_>> = samples
                .iter()
                .map(|s| CaseRow {
                    id: &s.id,
                    suite: s.kind.map(|k| k.as_str()),
                    title: &s.title,
                    check: s.check,
                    length: s.length_class().to_string(),
                    authored_length: s.curated_length().to_string(),
                    input: &s.input,
                    expected: &s.expected,
                })
                .collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for s in &samples {
                let suite = s.kind.map_or("-", |k| k.as_str());
                let _ = writeln!(
                    out,
                    "{:<18} {:<9} {} {}",
                    s.id,
                    suite,
                    s.length_class(),
                    s.title
                );
            }
            let _ = write!(out, "{} cases", samples.len());
            Ok(out)
        }
    }
}

/// Render finished case reports
pub fn render_reports(reports: &[CaseReport], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Text => Ok(reports
            .iter()
            .map(|r| r.verdict.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Progress reporter for case execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` cases
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, message: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(|| {
                let _ = self.term.write_line(message);
            }),
            None => {
                let _ = self.term.write_line(message);
            }
        }
    }

    /// Write `message` behind a colored glyph, or a plain tag without color
    fn tagged(&self, glyph: &str, color: &Style, tag: &str, message: &str) {
        let prefix = if self.use_color {
            color.apply_to(glyph).to_string()
        } else {
            tag.to_string()
        };
        self.line(&format!("{prefix} {message}"));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.tagged("✓", &Style::new().green().bold(), "PASS", message);
        }
    }

    /// Print a failure message; shown even in quiet mode
    pub fn failure(&self, message: &str) {
        self.tagged("✗", &Style::new().red().bold(), "FAIL", message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            self.tagged("⚠", &Style::new().yellow().bold(), "WARN", message);
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.line("");
        self.line(&styled);
    }

    /// Report a finished case on one line, with failures and notes indented
    pub fn case(&self, report: &CaseReport) {
        let verdict = &report.verdict;
        if verdict.passed {
            self.success(&report.case_id);
        } else {
            self.failure(&report.case_id);
            for failure in &verdict.failures {
                self.line(&format!("    - {failure}"));
            }
        }
        if !self.quiet {
            for note in &verdict.notes {
                self.line(&format!("    note: {note}"));
            }
        }
    }

    /// Print run summary
    pub fn summary(&self, passed: usize, failed: usize, skipped: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let total = passed + failed + skipped;
        let status = match (failed > 0, self.use_color) {
            (true, true) => style("FAILED").red().bold().to_string(),
            (false, true) => style("PASSED").green().bold().to_string(),
            (true, false) => "FAILED".to_string(),
            (false, false) => "PASSED".to_string(),
        };
        self.line("");
        self.line(&format!(
            "{status} {total} cases in {:.2}s ({passed} passed, {failed} failed, {skipped} skipped)",
            duration.as_secs_f64()
        ));
    }
}
