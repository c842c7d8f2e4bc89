//! Sequential case runner
//!
//! Every case gets a freshly opened session so one broken page cannot leak
//! state into the next case.

use crate::output::ProgressReporter;
use async_trait::async_trait;
use sinhala_probe::{
    run_case, CaseReport, Evidence, ProbeConfig, ProbeResult, Sample, TranslatorDriver,
    TranslatorSession, Verdict,
};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Opens sessions for the runner
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Driver behind the sessions
    type Driver: TranslatorDriver;

    /// Open a session on the translator page
    async fn open(&self, config: &ProbeConfig) -> ProbeResult<TranslatorSession<Self::Driver>>;
}

/// Launches a Chromium instance per session
#[cfg(feature = "browser")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumFactory;

#[cfg(feature = "browser")]
#[async_trait]
impl SessionFactory for ChromiumFactory {
    type Driver = sinhala_probe::ChromiumDriver;

    async fn open(&self, config: &ProbeConfig) -> ProbeResult<TranslatorSession<Self::Driver>> {
        sinhala_probe::launch_session(config.clone()).await
    }
}

/// Outcome of a run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Reports in execution order
    pub reports: Vec<CaseReport>,
    /// Cases not run because of fail-fast
    pub skipped: usize,
    /// Wall-clock time
    pub duration: Duration,
}

impl RunSummary {
    /// Passed case count
    #[must_use]
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.passed()).count()
    }

    /// Failed case count
    #[must_use]
    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }
}

/// Runs cases one after another
#[derive(Debug)]
pub struct SuiteRunner<F> {
    factory: F,
    config: ProbeConfig,
    fail_fast: bool,
}

impl<F: SessionFactory> SuiteRunner<F> {
    /// Create a runner
    pub const fn new(factory: F, config: ProbeConfig) -> Self {
        Self {
            factory,
            config,
            fail_fast: false,
        }
    }

    /// Stop after the first failing case
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Run one case; errors become a failing verdict
    pub async fn run_one(&self, sample: &Sample) -> CaseReport {
        match self.try_run(sample).await {
            Ok(report) => report,
            Err(e) => {
                warn!(case = %sample.id, error = %e, "case aborted");
                CaseReport {
                    case_id: sample.id.clone(),
                    suite: sample.kind,
                    input: sample.input.clone(),
                    evidence: Evidence::output(String::new()),
                    attempts: 0,
                    verdict: Verdict::errored(&sample.id, e),
                }
            }
        }
    }

    async fn try_run(&self, sample: &Sample) -> ProbeResult<CaseReport> {
        let mut session = self.factory.open(&self.config).await?;
        let result = run_case(&mut session, sample).await;
        if let Err(e) = session.close().await {
            debug!(error = %e, "session close failed");
        }
        result
    }

    /// Run `samples` in order, reporting each as it finishes
    pub async fn run(&self, samples: &[&Sample], reporter: &mut ProgressReporter) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        reporter.start_progress(samples.len() as u64, "running");
        for (index, sample) in samples.iter().enumerate() {
            reporter.set_message(&sample.id);
            let report = self.run_one(sample).await;
            reporter.case(&report);
            reporter.increment(1);

            let failed = !report.passed();
            summary.reports.push(report);
            if failed && self.fail_fast {
                summary.skipped = samples.len() - index - 1;
                reporter.warning(&format!(
                    "stopping after {}: {} cases skipped",
                    sample.id, summary.skipped
                ));
                break;
            }
        }
        reporter.finish();

        summary.duration = start.elapsed();
        summary
    }
}
