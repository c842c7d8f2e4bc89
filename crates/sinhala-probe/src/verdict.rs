//! Per-case verdicts.
//!
//! Each [`Check`] is a short list of assertions over the extracted output.
//! Every assertion is evaluated (soft-assert style) so a failing case reports
//! all of its problems at once.

use crate::deletion::DeletionReport;
use crate::sample::{Check, Sample};
use crate::script::has_sinhala;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Result of one assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Assertions over extracted output
#[derive(Debug, Clone, Copy)]
pub struct Assertion;

impl Assertion {
    /// Output is not empty
    #[must_use]
    pub fn non_empty(label: &str, output: &str) -> AssertionResult {
        if output.is_empty() {
            AssertionResult::fail(format!("{label} is empty"))
        } else {
            AssertionResult::pass()
        }
    }

    /// Output contains at least one Sinhala character
    #[must_use]
    pub fn has_sinhala(label: &str, output: &str) -> AssertionResult {
        if has_sinhala(output) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("{label} '{output}' has no Sinhala characters"))
        }
    }

    /// Output equals the expected text
    #[must_use]
    pub fn equals(expected: &str, actual: &str) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected '{expected}', got '{actual}'"))
        }
    }

    /// Output differs from the given text
    #[must_use]
    pub fn differs(unwanted: &str, actual: &str) -> AssertionResult {
        if unwanted == actual {
            AssertionResult::fail(format!("output unexpectedly equals '{unwanted}'"))
        } else {
            AssertionResult::pass()
        }
    }

    /// Output contains a substring
    #[must_use]
    pub fn contains(label: &str, haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {label} '{haystack}' to contain '{needle}'"))
        }
    }

    /// Output is at least as long as the expected text, in characters
    #[must_use]
    pub fn at_least_as_long(expected: &str, actual: &str) -> AssertionResult {
        let (want, got) = (expected.chars().count(), actual.chars().count());
        if got >= want {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("output has {got} chars, expected at least {want}"))
        }
    }
}

/// What a case observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evidence {
    /// Extracted output of one conversion
    Output {
        /// Extracted text, possibly empty
        output: String,
    },
    /// Outputs around a deletion run
    Deletion(DeletionReport),
}

impl Evidence {
    /// Evidence from one conversion
    #[must_use]
    pub fn output(output: impl Into<String>) -> Self {
        Self::Output {
            output: output.into(),
        }
    }

    /// The output the verdict is primarily about
    #[must_use]
    pub fn primary(&self) -> &str {
        match self {
            Self::Output { output } => output,
            Self::Deletion(report) => &report.initial,
        }
    }
}

/// Pass/fail outcome of one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Case identifier
    pub case_id: String,
    /// Whether every assertion held
    pub passed: bool,
    /// Messages of failed assertions
    pub failures: Vec<String>,
    /// Informational notes
    pub notes: Vec<String>,
}

impl Verdict {
    fn new(case_id: &str) -> Self {
        Self {
            case_id: case_id.to_string(),
            passed: true,
            failures: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn assert(&mut self, result: AssertionResult) {
        if !result.passed {
            self.passed = false;
            self.failures.push(result.message);
        }
    }

    fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Verdict for a case that could not run to completion
    #[must_use]
    pub fn errored(case_id: &str, error: impl fmt::Display) -> Self {
        let mut verdict = Self::new(case_id);
        verdict.assert(AssertionResult::fail(format!("case did not complete: {error}")));
        verdict
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "{status} {}", self.case_id)?;
        for failure in &self.failures {
            write!(f, "\n  - {failure}")?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

/// Evaluate a sample's check against what was observed
///
/// `strict` additionally requires positive cases to match the expected
/// output exactly. Evidence of the wrong shape for the check fails the case.
#[must_use]
pub fn evaluate(sample: &Sample, evidence: &Evidence, strict: bool) -> Verdict {
    let mut verdict = Verdict::new(&sample.id);
    let expected = sample.expected.as_str();

    match (sample.check, evidence) {
        (Check::Transliterates, Evidence::Output { output }) => {
            verdict.assert(Assertion::non_empty("output", output));
            verdict.assert(Assertion::has_sinhala("output", output));
            if strict {
                verdict.assert(Assertion::equals(expected, output));
            } else if output != expected {
                verdict.note(format!("output differs from expected '{expected}'"));
            }
        }
        (Check::DiffersFromExpected, Evidence::Output { output }) => {
            verdict.assert(Assertion::non_empty("output", output));
            verdict.assert(Assertion::differs(expected, output));
            if let Some(observed) = &sample.observed {
                if output == observed {
                    verdict.note("output matches the recorded incorrect form");
                } else {
                    verdict.note(format!("output differs from recorded form '{observed}'"));
                }
            }
        }
        (Check::Untruncated, Evidence::Output { output }) => {
            verdict.assert(Assertion::non_empty("output", output));
            verdict.assert(Assertion::has_sinhala("output", output));
            verdict.assert(Assertion::contains("output", output, expected));
            verdict.assert(Assertion::at_least_as_long(expected, output));
        }
        (Check::ClearsOnBackspace, Evidence::Deletion(report)) => {
            let initial = report.initial.as_str();
            verdict.assert(Assertion::non_empty("initial output", initial));
            verdict.assert(Assertion::has_sinhala("initial output", initial));
            verdict.assert(Assertion::contains("initial output", initial, expected));

            let remaining = report.final_output.as_str();
            if remaining.is_empty() {
                info!(case = %sample.id, "bug fixed: output cleared after deleting input");
                verdict.note("bug fixed: output cleared after deleting input");
            } else {
                info!(case = %sample.id, "bug confirmed: output did not clear after deleting input");
                verdict.note("bug confirmed: output did not clear after deleting input");
                verdict.assert(Assertion::has_sinhala("final output", remaining));
                verdict.assert(Assertion::contains("final output", remaining, expected));
            }
        }
        (check, evidence) => {
            let kind = match evidence {
                Evidence::Output { .. } => "a single output",
                Evidence::Deletion(_) => "a deletion report",
            };
            verdict.assert(AssertionResult::fail(format!(
                "{check:?} cannot be judged from {kind}"
            )));
        }
    }

    verdict
}
