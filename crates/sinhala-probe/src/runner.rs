//! Runs one catalog case against an open session.

use crate::deletion::DeletionSimulator;
use crate::driver::TranslatorDriver;
use crate::result::ProbeResult;
use crate::sample::{Check, Sample, SuiteKind};
use crate::session::TranslatorSession;
use crate::verdict::{evaluate, Evidence, Verdict};
use serde::{Deserialize, Serialize};

/// Everything a case produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case identifier
    pub case_id: String,
    /// Owning suite, when known
    pub suite: Option<SuiteKind>,
    /// Input typed into the page
    pub input: String,
    /// Observed output(s)
    pub evidence: Evidence,
    /// Read attempts spent on the conversion (0 for deletion runs)
    pub attempts: u32,
    /// Outcome
    pub verdict: Verdict,
}

impl CaseReport {
    /// Whether the case passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.verdict.passed
    }
}

/// Drive `session` through `sample` and judge the result
///
/// The session must already be open. Positive and negative cases use the
/// functional profile, UI cases the UI profile. Driver errors other than read
/// faults abort the case.
pub async fn run_case<D: TranslatorDriver>(
    session: &mut TranslatorSession<D>,
    sample: &Sample,
) -> ProbeResult<CaseReport> {
    let (evidence, attempts) = match sample.check {
        Check::Transliterates | Check::DiffersFromExpected => {
            let profile = session.config().functional.clone();
            let outcome = session.convert_with(&profile, &sample.input).await?;
            (Evidence::output(outcome.output), outcome.attempts)
        }
        Check::Untruncated => {
            let profile = session.config().ui.clone();
            let outcome = session.convert_with(&profile, &sample.input).await?;
            (Evidence::output(outcome.output), outcome.attempts)
        }
        Check::ClearsOnBackspace => {
            let profile = session.config().ui.clone();
            session
                .fill_and_settle(&sample.input, profile.deletion_settle())
                .await?;
            let report = DeletionSimulator::from_profile(&profile)
                .run(session, &sample.input)
                .await?;
            (Evidence::Deletion(report), 0)
        }
    };

    let verdict = evaluate(sample, &evidence, session.config().strict);
    Ok(CaseReport {
        case_id: sample.id.clone(),
        suite: sample.kind,
        input: sample.input.clone(),
        evidence,
        attempts,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::ProbeConfig;
    use crate::driver::MockDriver;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Fake translator: looks the input up in a table, echoes it otherwise
    fn fake_site(table: HashMap<String, String>, chrome: &'static str) -> MockDriver {
        let table = Arc::new(table);
        MockDriver::with_renderer(move |input| {
            let output = table.get(input).cloned().unwrap_or_else(|| input.to_string());
            format!("Singlish {input} Sinhala {chrome}{output} 🔁 Copy")
        })
    }

    async fn run(driver: MockDriver, sample: &Sample) -> CaseReport {
        let config = ProbeConfig::default().without_pauses();
        let mut session = TranslatorSession::new(driver, config);
        session.open().await.unwrap();
        run_case(&mut session, sample).await.unwrap()
    }

    #[tokio::test]
    async fn test_positive_suite_against_correct_site() {
        let catalog = Catalog::load().unwrap();
        let table: HashMap<_, _> = catalog
            .suite(SuiteKind::Positive)
            .map(|s| (s.input.clone(), s.expected.clone()))
            .collect();

        for sample in catalog.suite(SuiteKind::Positive) {
            let report = run(fake_site(table.clone(), ""), sample).await;
            assert!(report.passed(), "{}", report.verdict);
            assert_eq!(report.attempts, 1);
            assert_eq!(report.suite, Some(SuiteKind::Positive));
        }
    }

    #[tokio::test]
    async fn test_negative_suite_against_recorded_defects() {
        let catalog = Catalog::load().unwrap();
        let table: HashMap<_, _> = catalog
            .suite(SuiteKind::Negative)
            .filter_map(|s| Some((s.input.clone(), s.observed.clone()?)))
            .collect();

        for sample in catalog.suite(SuiteKind::Negative) {
            let report = run(fake_site(table.clone(), ""), sample).await;
            assert!(report.passed(), "{}", report.verdict);
        }
    }

    #[tokio::test]
    async fn test_negative_case_fails_once_site_is_fixed() {
        let catalog = Catalog::load().unwrap();
        let sample = catalog.by_id("Neg_Fun_0001").unwrap();
        // The site now passes the address through untouched
        let report = run(fake_site(HashMap::new(), ""), sample).await;
        assert!(!report.passed());
    }

    #[tokio::test]
    async fn test_untruncated_with_chrome_prefix() {
        let catalog = Catalog::load().unwrap();
        let sample = catalog.by_id("Pos_UI_Fun_0001").unwrap();
        let table = HashMap::from([(sample.input.clone(), sample.expected.clone())]);

        let report = run(fake_site(table, "Copy Clear "), sample).await;
        assert!(report.passed(), "{}", report.verdict);
        assert_eq!(report.evidence.primary(), sample.expected);
    }

    #[tokio::test]
    async fn test_backspace_case_on_stale_site() {
        let catalog = Catalog::load().unwrap();
        let sample = catalog.by_id("Neg_UI_Fun_0001").unwrap().clone();
        let expected = sample.expected.clone();
        let driver =
            MockDriver::with_renderer(move |_| format!("Singlish Sinhala {expected} 🔁 Copy"));

        let report = run(driver, &sample).await;
        assert!(report.passed(), "{}", report.verdict);
        assert!(report.verdict.notes[0].starts_with("bug confirmed"));
        match report.evidence {
            Evidence::Deletion(deletion) => assert_eq!(deletion.presses, 16),
            Evidence::Output { .. } => panic!("expected deletion evidence"),
        }
    }

    #[tokio::test]
    async fn test_backspace_case_on_fixed_site() {
        let catalog = Catalog::load().unwrap();
        let sample = catalog.by_id("Neg_UI_Fun_0001").unwrap();
        let table = HashMap::from([(sample.input.clone(), sample.expected.clone())]);
        let driver = MockDriver::with_renderer(move |input| {
            let output = table.get(input).cloned().unwrap_or_default();
            format!("Singlish Sinhala {output} 🔁")
        });

        let report = run(driver, sample).await;
        assert!(report.passed(), "{}", report.verdict);
        assert!(report.verdict.notes[0].starts_with("bug fixed"));
    }

    #[tokio::test]
    async fn test_backspace_case_skips_clear() {
        let catalog = Catalog::load().unwrap();
        let sample = catalog.by_id("Neg_UI_Fun_0001").unwrap();
        let config = ProbeConfig::default();
        let mut session = TranslatorSession::new(MockDriver::new(), config);
        run_case(&mut session, sample).await.unwrap();

        let driver = session.driver();
        assert!(!driver.was_called("clear"));
        assert!(driver.history().iter().any(|c| c == "wait:3000"));
        assert_eq!(driver.call_count("press_key"), 16);
    }

    #[tokio::test]
    async fn test_strict_mode_from_config() {
        let sample = Sample::new("Pos_X", "adha", "අද", Check::Transliterates);
        let driver = MockDriver::with_frames(["Sinhala අදා 🔁"]);
        let config = ProbeConfig::default().without_pauses().with_strict(true);
        let mut session = TranslatorSession::new(driver, config);
        let report = run_case(&mut session, &sample).await.unwrap();
        assert!(!report.passed());
    }
}
