//! Sample data model: one input/expected pair per case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which suite a sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteKind {
    /// Correct transliteration expected
    Positive,
    /// Known defect of the remote site; the correct form must not appear
    Negative,
    /// Display and editing behavior
    Ui,
}

impl SuiteKind {
    /// All suites in catalog order
    pub const ALL: [Self; 3] = [Self::Positive, Self::Negative, Self::Ui];

    /// Suite name as used in catalog files and on the command line
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Ui => "ui",
        }
    }
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SuiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown suite '{s}' (expected positive, negative or ui)"))
    }
}

/// Verdict applied to a sample's extracted output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Output is non-empty and written in the target script
    Transliterates,
    /// Output is non-empty and differs from the correct transliteration
    DiffersFromExpected,
    /// Output contains the expected text in full
    Untruncated,
    /// Output tracks character-by-character deletion of the input
    ClearsOnBackspace,
}

impl Check {
    /// Whether this check drives the deletion simulator
    #[must_use]
    pub const fn needs_deletion(&self) -> bool {
        matches!(self, Self::ClearsOnBackspace)
    }
}

/// Input size bucket, by character count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthClass {
    /// At most 30 characters
    S,
    /// 31 to 299 characters
    M,
    /// 300 characters or more
    L,
}

impl LengthClass {
    /// Classify a text by its character count
    #[must_use]
    pub fn of(text: &str) -> Self {
        match text.chars().count() {
            0..=30 => Self::S,
            31..=299 => Self::M,
            _ => Self::L,
        }
    }
}

impl fmt::Display for LengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
        };
        f.write_str(s)
    }
}

/// One curated case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Case identifier, e.g. `Pos_Fun_0001`
    pub id: String,
    /// Short description
    #[serde(default)]
    pub title: String,
    /// Singlish input typed into the page
    pub input: String,
    /// Correct Sinhala transliteration
    pub expected: String,
    /// Known-incorrect output recorded from the site (negative cases)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,
    /// Verdict to apply
    pub check: Check,
    /// Length class recorded by the case author; may disagree with [`Sample::length_class`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthClass>,
    /// Owning suite; filled in from the catalog document
    #[serde(skip)]
    pub kind: Option<SuiteKind>,
}

impl Sample {
    /// Create a sample
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        input: impl Into<String>,
        expected: impl Into<String>,
        check: Check,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            input: input.into(),
            expected: expected.into(),
            observed: None,
            check,
            length: None,
            kind: None,
        }
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the known-incorrect output
    #[must_use]
    pub fn with_observed(mut self, observed: impl Into<String>) -> Self {
        self.observed = Some(observed.into());
        self
    }

    /// Set the authored length class
    #[must_use]
    pub const fn with_length(mut self, length: LengthClass) -> Self {
        self.length = Some(length);
        self
    }

    /// Length class of the input
    #[must_use]
    pub fn length_class(&self) -> LengthClass {
        LengthClass::of(&self.input)
    }

    /// Authored length class, falling back to the computed one
    #[must_use]
    pub fn curated_length(&self) -> LengthClass {
        self.length.unwrap_or_else(|| self.length_class())
    }

    /// `id - title`, the way cases are named in reports
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.title.is_empty() {
            self.id.clone()
        } else {
            format!("{} - {}", self.id, self.title)
        }
    }
}
