//! Script-membership predicate.
//!
//! Detects whether text contains characters from a target script, given as
//! an inclusive Unicode code-point range. Every function here is pure and
//! total.

use serde::{Deserialize, Serialize};

/// Inclusive code-point range of a script block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptRange {
    /// First code point in the block
    pub start: u32,
    /// Last code point in the block (inclusive)
    pub end: u32,
}

impl ScriptRange {
    /// The Sinhala block, U+0D80..=U+0DFF
    pub const SINHALA: Self = Self::new(0x0D80, 0x0DFF);

    /// Create a range. Bounds are swapped if given in reverse.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Check whether a character lies in this range
    #[must_use]
    pub const fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        cp >= self.start && cp <= self.end
    }

    /// Check whether any character of `text` lies in this range
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        text.chars().any(|c| self.contains(c))
    }

    /// Byte index of the first in-range character of `text`
    #[must_use]
    pub fn first_index(&self, text: &str) -> Option<usize> {
        text.char_indices()
            .find(|&(_, c)| self.contains(c))
            .map(|(i, _)| i)
    }
}

impl Default for ScriptRange {
    fn default() -> Self {
        Self::SINHALA
    }
}

impl std::fmt::Display for ScriptRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "U+{:04X}..=U+{:04X}", self.start, self.end)
    }
}

/// Whether `text` contains at least one character in `range`
#[must_use]
pub fn contains_script(text: &str, range: ScriptRange) -> bool {
    range.matches(text)
}

/// Byte index of the first character of `text` in `range`
#[must_use]
pub fn first_script_index(text: &str, range: ScriptRange) -> Option<usize> {
    range.first_index(text)
}

/// Whether `text` contains at least one Sinhala character
#[must_use]
pub fn has_sinhala(text: &str) -> bool {
    ScriptRange::SINHALA.matches(text)
}
