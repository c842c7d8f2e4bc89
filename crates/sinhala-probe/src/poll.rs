//! Fixed-interval polling for asynchronously rendered output.
//!
//! The translator updates its output pane some time after the input changes,
//! so one read is not reliable. The poller spends a bounded budget of
//! attempts, each preceded by a fixed dwell, and stops at the first
//! non-empty extraction. There is no backoff.

use crate::driver::TranslatorDriver;
use crate::extract::OutputExtractor;
use crate::result::ProbeResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default attempt budget
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Default dwell before each attempt (3 seconds)
pub const DEFAULT_DWELL_MS: u64 = 3_000;

/// Default extra wait after an empty attempt (3 seconds)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 3_000;

/// Polling budget and intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum number of extraction attempts (at least one is always made)
    pub max_attempts: u32,
    /// Wait before every attempt, in milliseconds
    pub dwell_ms: u64,
    /// Additional wait after an empty attempt with budget left, in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            dwell_ms: DEFAULT_DWELL_MS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl PollConfig {
    /// Create a config with the given budget and dwell, retry delay equal to dwell
    #[must_use]
    pub const fn new(max_attempts: u32, dwell_ms: u64) -> Self {
        Self {
            max_attempts,
            dwell_ms,
            retry_delay_ms: dwell_ms,
        }
    }

    /// A single read after `dwell_ms`
    #[must_use]
    pub const fn once(dwell_ms: u64) -> Self {
        Self {
            max_attempts: 1,
            dwell_ms,
            retry_delay_ms: 0,
        }
    }

    /// Set maximum attempts
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set retry delay in milliseconds
    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Attempt budget, never below one
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Dwell as Duration
    #[must_use]
    pub const fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    /// Retry delay as Duration
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Total time spent waiting if every attempt comes back empty
    #[must_use]
    pub fn worst_case(&self) -> Duration {
        let n = self.attempts();
        self.dwell() * n + self.retry_delay() * (n - 1)
    }
}

/// What a polling run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Last extraction result, possibly empty
    pub output: String,
    /// Attempts consumed
    pub attempts: u32,
    /// Attempts whose page read faulted
    pub faults: u32,
}

impl PollOutcome {
    /// Whether any output was found
    #[must_use]
    pub fn found(&self) -> bool {
        !self.output.is_empty()
    }
}

/// Poll the page until the extractor yields non-empty output or the budget runs out
///
/// Read faults are logged and count as empty attempts. Only a failing
/// [`TranslatorDriver::wait`] aborts the run.
pub async fn poll_output<D>(
    driver: &mut D,
    scope: &str,
    extractor: &OutputExtractor,
    config: &PollConfig,
) -> ProbeResult<PollOutcome>
where
    D: TranslatorDriver + ?Sized,
{
    let budget = config.attempts();
    let mut outcome = PollOutcome::default();

    for attempt in 1..=budget {
        driver.wait(config.dwell()).await?;
        outcome.attempts = attempt;

        match driver.read_text(scope).await {
            Ok(text) => outcome.output = extractor.extract(&text),
            Err(e) => {
                outcome.faults += 1;
                outcome.output.clear();
                if e.is_transient() {
                    warn!(attempt, error = %e, "failed to get output");
                } else {
                    error!(attempt, error = %e, "failed to get output");
                }
            }
        }

        if outcome.found() {
            debug!(attempt, "output found");
            return Ok(outcome);
        }

        if attempt < budget {
            debug!(attempt, remaining = budget - attempt, "output not found, retrying");
            driver.wait(config.retry_delay()).await?;
        }
    }

    debug!(attempts = budget, "poll budget exhausted");
    Ok(outcome)
}

/// Wait `dwell`, read once and extract
///
/// A read fault is logged and yields an empty string.
pub async fn read_once<D>(
    driver: &mut D,
    scope: &str,
    extractor: &OutputExtractor,
    dwell: Duration,
) -> ProbeResult<String>
where
    D: TranslatorDriver + ?Sized,
{
    let config = PollConfig::once(dwell.as_millis().try_into().unwrap_or(u64::MAX));
    Ok(poll_output(driver, scope, extractor, &config).await?.output)
}
