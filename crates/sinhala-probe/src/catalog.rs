//! Curated case catalog.
//!
//! The cases live in three YAML documents under `catalog/`, one per suite,
//! embedded at compile time. Each document carries a schema version and a
//! suite name; ids must be unique across all three.

use crate::result::{ProbeError, ProbeResult};
use crate::sample::{Sample, SuiteKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Supported catalog schema version
pub const CATALOG_VERSION: &str = "1.0";

const POSITIVE_YAML: &str = include_str!("../catalog/positive.yaml");
const NEGATIVE_YAML: &str = include_str!("../catalog/negative.yaml");
const UI_YAML: &str = include_str!("../catalog/ui.yaml");

/// One suite document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteDocument {
    /// Schema version (must be "1.0")
    pub version: String,
    /// Suite the cases belong to
    pub suite: SuiteKind,
    /// Cases in document order
    #[serde(default)]
    pub cases: Vec<Sample>,
}

impl SuiteDocument {
    /// Parse and validate a suite document
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        let mut doc: Self = serde_yaml_ng::from_str(yaml)?;
        doc.validate()?;
        let kind = doc.suite;
        for case in &mut doc.cases {
            case.kind = Some(kind);
        }
        Ok(doc)
    }

    fn validate(&self) -> ProbeResult<()> {
        if self.version != CATALOG_VERSION {
            return Err(ProbeError::catalog(format!(
                "invalid version '{}', expected '{CATALOG_VERSION}'",
                self.version
            )));
        }
        for case in &self.cases {
            if case.id.trim().is_empty() {
                return Err(ProbeError::catalog(format!(
                    "{} suite has a case without an id",
                    self.suite
                )));
            }
            if case.input.is_empty() {
                return Err(ProbeError::catalog(format!("{}: empty input", case.id)));
            }
            if case.expected.is_empty() {
                return Err(ProbeError::catalog(format!("{}: empty expected output", case.id)));
            }
        }
        Ok(())
    }
}

/// Ordered collection of samples across suites
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    samples: Vec<Sample>,
}

impl Catalog {
    /// Load the embedded catalog
    pub fn load() -> ProbeResult<Self> {
        Self::from_documents(&[POSITIVE_YAML, NEGATIVE_YAML, UI_YAML])
    }

    /// Build a catalog from YAML suite documents, in order
    pub fn from_documents(docs: &[&str]) -> ProbeResult<Self> {
        let mut catalog = Self::default();
        for yaml in docs {
            let doc = SuiteDocument::from_yaml(yaml)?;
            catalog.extend(doc.cases)?;
        }
        Ok(catalog)
    }

    /// Append samples, rejecting duplicate ids
    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) -> ProbeResult<()> {
        let mut seen: HashSet<String> = self.samples.iter().map(|s| s.id.clone()).collect();
        for sample in samples {
            if !seen.insert(sample.id.clone()) {
                return Err(ProbeError::catalog(format!("duplicate case id {}", sample.id)));
            }
            self.samples.push(sample);
        }
        Ok(())
    }

    /// Look up a case by id
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.id == id)
    }

    /// Cases of one suite, in catalog order
    pub fn suite(&self, kind: SuiteKind) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(move |s| s.kind == Some(kind))
    }

    /// Cases whose id or title contains `pattern` (case-insensitive)
    pub fn filter<'a>(&'a self, pattern: &str) -> impl Iterator<Item = &'a Sample> + 'a {
        let needle = pattern.to_lowercase();
        self.samples.iter().filter(move |s| {
            s.id.to_lowercase().contains(&needle) || s.title.to_lowercase().contains(&needle)
        })
    }

    /// All cases
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Number of cases
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the catalog has no cases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Check, LengthClass};
    use crate::script::has_sinhala;

    const MINIMAL: &str = r#"
version: "1.0"
suite: positive
cases:
  - id: Pos_Fun_0001
    input: "adha"
    expected: "අද"
    check: transliterates
"#;

    mod document_tests {
        use super::*;

        #[test]
        fn test_parse_minimal() {
            let doc = SuiteDocument::from_yaml(MINIMAL).unwrap();
            assert_eq!(doc.suite, SuiteKind::Positive);
            assert_eq!(doc.cases.len(), 1);
            assert_eq!(doc.cases[0].kind, Some(SuiteKind::Positive));
        }

        #[test]
        fn test_reject_invalid_version() {
            let yaml = MINIMAL.replace("version: \"1.0\"", "version: \"2.0\"");
            let err = SuiteDocument::from_yaml(&yaml).unwrap_err();
            assert!(err.to_string().contains("invalid version '2.0'"));
        }

        #[test]
        fn test_reject_empty_input() {
            let yaml = MINIMAL.replace("input: \"adha\"", "input: \"\"");
            assert!(matches!(
                SuiteDocument::from_yaml(&yaml),
                Err(ProbeError::Catalog { .. })
            ));
        }

        #[test]
        fn test_reject_unknown_check() {
            let yaml = MINIMAL.replace("check: transliterates", "check: sparkles");
            assert!(matches!(
                SuiteDocument::from_yaml(&yaml),
                Err(ProbeError::Yaml(_))
            ));
        }

        #[test]
        fn test_duplicate_ids_rejected() {
            let err = Catalog::from_documents(&[MINIMAL, MINIMAL]).unwrap_err();
            assert!(err.to_string().contains("duplicate case id Pos_Fun_0001"));
        }
    }

    mod embedded_tests {
        use super::*;

        #[test]
        fn test_suite_counts() {
            let catalog = Catalog::load().unwrap();
            assert_eq!(catalog.len(), 38);
            assert_eq!(catalog.suite(SuiteKind::Positive).count(), 26);
            assert_eq!(catalog.suite(SuiteKind::Negative).count(), 10);
            assert_eq!(catalog.suite(SuiteKind::Ui).count(), 2);
        }

        #[test]
        fn test_ids_unique_and_prefixed() {
            let catalog = Catalog::load().unwrap();
            let ids: HashSet<_> = catalog.iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids.len(), catalog.len());

            for sample in catalog.suite(SuiteKind::Positive) {
                assert!(sample.id.starts_with("Pos_Fun_"), "{}", sample.id);
            }
            for sample in catalog.suite(SuiteKind::Negative) {
                assert!(sample.id.starts_with("Neg_Fun_"), "{}", sample.id);
            }
        }

        #[test]
        fn test_checks_follow_suite() {
            let catalog = Catalog::load().unwrap();
            assert!(catalog
                .suite(SuiteKind::Positive)
                .all(|s| s.check == Check::Transliterates));
            assert!(catalog
                .suite(SuiteKind::Negative)
                .all(|s| s.check == Check::DiffersFromExpected && s.observed.is_some()));
            assert_eq!(
                catalog.by_id("Pos_UI_Fun_0001").map(|s| s.check),
                Some(Check::Untruncated)
            );
            assert_eq!(
                catalog.by_id("Neg_UI_Fun_0001").map(|s| s.check),
                Some(Check::ClearsOnBackspace)
            );
        }

        #[test]
        fn test_expected_outputs_are_sinhala() {
            let catalog = Catalog::load().unwrap();
            let non_negative = catalog.iter().filter(|s| s.kind != Some(SuiteKind::Negative));
            for sample in non_negative {
                assert!(has_sinhala(&sample.expected), "{}", sample.id);
            }
            // Identifiers should pass through untouched
            let email = catalog.by_id("Neg_Fun_0001").unwrap();
            assert!(!has_sinhala(&email.expected));
            assert!(has_sinhala(email.observed.as_deref().unwrap()));
        }

        #[test]
        fn test_length_classes() {
            let catalog = Catalog::load().unwrap();
            for sample in &catalog {
                let expected = if sample.id == "Neg_UI_Fun_0001" {
                    LengthClass::S
                } else {
                    LengthClass::M
                };
                assert_eq!(sample.length_class(), expected, "{}", sample.id);
            }
        }

        #[test]
        fn test_authored_lengths() {
            let catalog = Catalog::load().unwrap();
            assert!(catalog.iter().all(|s| s.length.is_some()));

            let disagreeing: Vec<_> = catalog
                .iter()
                .filter(|s| s.curated_length() != s.length_class())
                .map(|s| (s.id.as_str(), s.curated_length()))
                .collect();
            assert_eq!(disagreeing.len(), 9);
            assert!(disagreeing.contains(&("Neg_Fun_0001", LengthClass::S)));
            assert!(disagreeing.contains(&("Neg_Fun_0003", LengthClass::L)));
            assert!(disagreeing.contains(&("Neg_Fun_0004", LengthClass::L)));
            assert!(disagreeing.contains(&("Pos_Fun_0012", LengthClass::S)));
        }

        #[test]
        fn test_backspace_case() {
            let catalog = Catalog::load().unwrap();
            let sample = catalog.by_id("Neg_UI_Fun_0001").unwrap();
            assert_eq!(sample.input, "api bath kanavaa");
            assert_eq!(sample.expected, "අපි බත් කනවා");
        }

        #[test]
        fn test_filter() {
            let catalog = Catalog::load().unwrap();
            assert_eq!(catalog.filter("ui_fun").count(), 2);
            assert!(catalog.filter("no-such-case").next().is_none());
        }
    }
}
