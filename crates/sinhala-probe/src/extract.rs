//! Output extraction from rendered page text.
//!
//! The translator page has no stable selector for its output pane, so the
//! output is located by text landmarks instead:
//!
//! ```text
//!   ... Singlish [input] ... Sinhala <output text> 🔁 Copy ...
//!                            ^label                ^marker
//! ```
//!
//! The region between the last label and the first marker after it is the
//! candidate. Failing to find either anchor means "not rendered yet" and
//! yields an empty string.

use crate::result::{ProbeError, ProbeResult};
use crate::script::ScriptRange;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default label token preceding the output pane
pub const DEFAULT_LABEL: &str = "Sinhala";

/// Default marker glyph following the output pane
pub const DEFAULT_MARKER: &str = "🔁";

/// Textual landmarks bounding the output region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchors {
    /// Label token; the last occurrence is used
    pub label: String,
    /// Marker token; the first occurrence after the label is used
    pub marker: String,
    /// Script the output is expected to be written in
    #[serde(default)]
    pub script: ScriptRange,
    /// UI chrome words stripped from the front by [`Strategy::ChromeStripped`]
    #[serde(default = "default_chrome_words")]
    pub chrome_words: Vec<String>,
}

fn default_chrome_words() -> Vec<String> {
    ["Copy", "Clear", "Export", "Share"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            script: ScriptRange::SINHALA,
            chrome_words: default_chrome_words(),
        }
    }
}

impl Anchors {
    /// Create anchors with the default script and chrome words
    #[must_use]
    pub fn new(label: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            marker: marker.into(),
            ..Self::default()
        }
    }

    /// Set the target script
    #[must_use]
    pub const fn with_script(mut self, script: ScriptRange) -> Self {
        self.script = script;
        self
    }

    /// Replace the chrome word list
    #[must_use]
    pub fn with_chrome_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chrome_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Reject anchors that would match everywhere
    pub fn validate(&self) -> ProbeResult<()> {
        if self.label.is_empty() {
            return Err(ProbeError::config("anchor label must not be empty"));
        }
        if self.marker.is_empty() {
            return Err(ProbeError::config("anchor marker must not be empty"));
        }
        Ok(())
    }
}

/// How the candidate region is narrowed down to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Start at the first target-script character, else collapse whitespace
    #[default]
    ScriptAnchored,
    /// Trim, then strip a leading run of chrome words and whitespace
    ChromeStripped,
}

/// Locates the transliteration output inside page text
#[derive(Debug, Clone)]
pub struct OutputExtractor {
    anchors: Anchors,
    strategy: Strategy,
    chrome: Option<Regex>,
}

impl Default for OutputExtractor {
    fn default() -> Self {
        Self::new(Anchors::default())
    }
}

impl OutputExtractor {
    /// Create an extractor using [`Strategy::ScriptAnchored`]
    #[must_use]
    pub fn new(anchors: Anchors) -> Self {
        Self::with_strategy(anchors, Strategy::ScriptAnchored)
    }

    /// Create an extractor with an explicit strategy
    #[must_use]
    pub fn with_strategy(anchors: Anchors, strategy: Strategy) -> Self {
        let chrome = chrome_pattern(&anchors.chrome_words);
        Self {
            anchors,
            strategy,
            chrome,
        }
    }

    /// Anchors in use
    #[must_use]
    pub const fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    /// Strategy in use
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Extract the output from full page text, or `""` if none is located
    #[must_use]
    pub fn extract(&self, page_text: &str) -> String {
        let Some(region) = self.region(page_text) else {
            return String::new();
        };
        match self.strategy {
            Strategy::ScriptAnchored => self.script_anchored(region),
            Strategy::ChromeStripped => self.chrome_stripped(region),
        }
    }

    /// Text strictly between the last label and the next marker
    #[must_use]
    pub fn region<'a>(&self, page_text: &'a str) -> Option<&'a str> {
        let Anchors { label, marker, .. } = &self.anchors;
        if label.is_empty() || marker.is_empty() {
            return None;
        }
        let start = page_text.rfind(label.as_str())? + label.len();
        let len = page_text[start..].find(marker.as_str())?;
        Some(&page_text[start..start + len])
    }

    fn script_anchored(&self, region: &str) -> String {
        if let Some(idx) = self.anchors.script.first_index(region) {
            return region[idx..].trim().to_string();
        }
        region.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn chrome_stripped(&self, region: &str) -> String {
        let trimmed = region.trim();
        let rest = match &self.chrome {
            Some(re) => re.find(trimmed).map_or(trimmed, |m| &trimmed[m.end()..]),
            None => trimmed,
        };
        rest.trim().to_string()
    }
}

/// `^(?:Copy|Clear|...|\s)+`, case-insensitive
fn chrome_pattern(words: &[String]) -> Option<Regex> {
    let mut alternatives: Vec<String> = words
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| regex::escape(w))
        .collect();
    alternatives.push(r"\s".to_string());
    Regex::new(&format!("(?i)^(?:{})+", alternatives.join("|"))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> String {
        OutputExtractor::default().extract(text)
    }

    mod anchor_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let anchors = Anchors::default();
            assert_eq!(anchors.label, "Sinhala");
            assert_eq!(anchors.marker, "🔁");
            assert_eq!(anchors.script, ScriptRange::SINHALA);
            assert_eq!(anchors.chrome_words.len(), 4);
        }

        #[test]
        fn test_validate_rejects_empty_tokens() {
            assert!(Anchors::new("", "🔁").validate().is_err());
            assert!(Anchors::new("Sinhala", "").validate().is_err());
            assert!(Anchors::default().validate().is_ok());
        }

        #[test]
        fn test_empty_tokens_extract_nothing() {
            let extractor = OutputExtractor::new(Anchors::new("", "🔁"));
            assert_eq!(extractor.extract("Sinhala අපි 🔁"), "");
        }

        #[test]
        fn test_anchors_from_yaml() {
            let anchors: Anchors =
                serde_yaml_ng::from_str("label: Output\nmarker: \"⇄\"\n").unwrap();
            assert_eq!(anchors.label, "Output");
            assert_eq!(anchors.script, ScriptRange::SINHALA);
            assert_eq!(anchors.chrome_words, default_chrome_words());
        }
    }

    mod script_anchored_tests {
        use super::*;

        #[test]
        fn test_reference_page() {
            let page = "Label: Singlish\nSinhala අපි බත් කනවා 🔁 Copy";
            assert_eq!(extract(page), "අපි බත් කනවා");
        }

        #[test]
        fn test_no_marker_is_empty() {
            assert_eq!(extract("Singlish api\nSinhala අපි බත් කනවා Copy"), "");
        }

        #[test]
        fn test_no_label_is_empty() {
            assert_eq!(extract("Singlish api අපි 🔁 Copy"), "");
        }

        #[test]
        fn test_marker_only_before_label_is_empty() {
            assert_eq!(extract("🔁 Singlish Sinhala අපි"), "");
        }

        #[test]
        fn test_last_label_wins() {
            assert_eq!(extract("Sinhala ... Sinhala XYZ 🔁"), "XYZ");
        }

        #[test]
        fn test_leading_chrome_dropped_before_script() {
            let page = "Sinhala\n  Output Copy\n  මට හරිම නින්දයි 🔁";
            assert_eq!(extract(page), "මට හරිම නින්දයි");
        }

        #[test]
        fn test_leading_latin_dropped_inner_latin_kept() {
            let page = "Sinhala Google Pixel එකේ camera quality එක 🔁";
            assert_eq!(extract(page), "එකේ camera quality එක");
        }

        #[test]
        fn test_fallback_collapses_whitespace() {
            let page = "Sinhala\n\n  Apple   Store\n\tiphone  🔁";
            assert_eq!(extract(page), "Apple Store iphone");
        }

        #[test]
        fn test_whitespace_only_region_is_empty() {
            assert_eq!(extract("Sinhala \n\t 🔁"), "");
        }

        #[test]
        fn test_adjacent_anchors_is_empty() {
            assert_eq!(extract("Sinhala🔁"), "");
        }

        #[test]
        fn test_first_marker_after_label_bounds_region() {
            let page = "Sinhala අපි 🔁 ගියා 🔁";
            assert_eq!(extract(page), "අපි");
        }

        #[test]
        fn test_zero_width_joiner_preserved() {
            let page = "Sinhala විද්‍යාත්මක 🔁";
            assert_eq!(extract(page), "විද්‍යාත්මක");
        }

        #[test]
        fn test_custom_anchors() {
            let extractor = OutputExtractor::new(Anchors::new("Output", "[copy]"));
            assert_eq!(extractor.extract("Input x Output ලක් [copy]"), "ලක්");
        }

        #[test]
        fn test_region_exposed() {
            let extractor = OutputExtractor::default();
            assert_eq!(extractor.region("a Sinhala b 🔁 c"), Some(" b "));
            assert_eq!(extractor.region("a Sinhala b"), None);
        }
    }

    mod chrome_stripped_tests {
        use super::*;

        fn ui_extract(text: &str) -> String {
            OutputExtractor::with_strategy(Anchors::default(), Strategy::ChromeStripped)
                .extract(text)
        }

        #[test]
        fn test_strips_leading_chrome_words() {
            let page = "Sinhala Copy Clear  කරුණාකරලා මට 🔁";
            assert_eq!(ui_extract(page), "කරුණාකරලා මට");
        }

        #[test]
        fn test_case_insensitive() {
            assert_eq!(ui_extract("Sinhala copy SHARE export අපි 🔁"), "අපි");
        }

        #[test]
        fn test_keeps_latin_output() {
            assert_eq!(ui_extract("Sinhala Apple Store 🔁"), "Apple Store");
        }

        #[test]
        fn test_only_chrome_is_empty() {
            assert_eq!(ui_extract("Sinhala Copy Clear 🔁"), "");
        }

        #[test]
        fn test_missing_anchor_is_empty() {
            assert_eq!(ui_extract("Sinhala Copy අපි"), "");
        }

        #[test]
        fn test_empty_word_list_only_trims() {
            let extractor = OutputExtractor::with_strategy(
                Anchors::default().with_chrome_words(Vec::<String>::new()),
                Strategy::ChromeStripped,
            );
            assert_eq!(extractor.extract("Sinhala  Copy අපි 🔁"), "Copy අපි");
        }

        #[test]
        fn test_regex_metacharacters_escaped() {
            let extractor = OutputExtractor::with_strategy(
                Anchors::default().with_chrome_words(["(c)"]),
                Strategy::ChromeStripped,
            );
            assert_eq!(extractor.extract("Sinhala (c) අපි 🔁"), "අපි");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_no_label_yields_empty(text in "[a-zA-Z0-9 \\n🔁අපි]{0,64}") {
                prop_assume!(!text.contains("Sinhala"));
                prop_assert_eq!(extract(&text), "");
            }

            #[test]
            fn prop_no_marker_after_label_yields_empty(
                before in "[a-zA-Z0-9 🔁]{0,32}",
                after in "[a-zA-Z0-9 \\nඅපි]{0,32}",
            ) {
                prop_assume!(!after.contains("Sinhala"));
                let text = format!("{before}Sinhala{after}");
                prop_assert_eq!(extract(&text), "");
            }

            #[test]
            fn prop_script_char_through_marker(
                head in "[a-zA-Z ]{0,16}",
                pad in "[a-z \\n]{0,8}",
                cp in 0x0D85u32..=0x0DC6,
                rest in "[a-z අපි]{0,16}",
                tail in "[a-zA-Z ]{0,16}",
            ) {
                prop_assume!(!tail.contains("Sinhala"));
                let c = char::from_u32(cp).unwrap();
                let text = format!("{head}Sinhala{pad}{c}{rest}🔁{tail}");
                let expected = format!("{c}{rest}").trim().to_string();
                prop_assert_eq!(extract(&text), expected);
            }

            #[test]
            fn prop_only_last_label_counts(
                first in "[a-zA-Z අපි]{0,16}",
                second in "[a-z ]{0,16}ක[a-z ]{0,8}",
            ) {
                prop_assume!(!first.contains("Sinhala") && !second.contains("Sinhala"));
                let doubled = format!("Sinhala {first} Sinhala {second} 🔁");
                let single = format!("Sinhala {second} 🔁");
                prop_assert_eq!(extract(&doubled), extract(&single));
            }

            #[test]
            fn prop_idempotent(text in "\\PC{0,64}") {
                let extractor = OutputExtractor::default();
                prop_assert_eq!(extractor.extract(&text), extractor.extract(&text));
            }

            #[test]
            fn prop_output_has_no_surrounding_whitespace(text in "[a-z \\n\\tSinhalaකා🔁]{0,64}") {
                let out = extract(&text);
                prop_assert_eq!(out.trim(), out.as_str());
            }
        }
    }
}
