//! Character-by-character deletion simulator.
//!
//! Reproduces a user erasing the input one Backspace at a time. The output is
//! read once before the first key press and once after the last, so callers
//! can tell whether the output pane follows the input down to empty.

use crate::config::SuiteProfile;
use crate::driver::{TranslatorDriver, BACKSPACE};
use crate::result::ProbeResult;
use crate::session::TranslatorSession;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Output before and after deleting the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionReport {
    /// Output read before the first Backspace
    pub initial: String,
    /// Output read after the last Backspace
    pub final_output: String,
    /// Backspace presses issued
    pub presses: usize,
}

impl DeletionReport {
    /// Whether the output pane still shows text after the input was erased
    #[must_use]
    pub fn output_persisted(&self) -> bool {
        !self.final_output.is_empty()
    }
}

/// Issues one Backspace per input character with a fixed delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionSimulator {
    keystroke_delay: Duration,
    post_delay: Duration,
}

impl Default for DeletionSimulator {
    fn default() -> Self {
        Self::from_profile(&SuiteProfile::ui())
    }
}

impl DeletionSimulator {
    /// Create a simulator
    #[must_use]
    pub const fn new(keystroke_delay: Duration, post_delay: Duration) -> Self {
        Self {
            keystroke_delay,
            post_delay,
        }
    }

    /// Take delays from a suite profile
    #[must_use]
    pub const fn from_profile(profile: &SuiteProfile) -> Self {
        Self::new(profile.keystroke_delay(), profile.post_deletion())
    }

    /// Delay between presses
    #[must_use]
    pub const fn keystroke_delay(&self) -> Duration {
        self.keystroke_delay
    }

    /// Erase `input` from the field, reading the output before and after
    ///
    /// `input` must already be in the field. The number of presses is its
    /// length in Unicode scalar values.
    pub async fn run<D: TranslatorDriver>(
        &self,
        session: &mut TranslatorSession<D>,
        input: &str,
    ) -> ProbeResult<DeletionReport> {
        let initial = session.read_output().await?;
        let presses = input.chars().count();
        debug!(presses, "deleting input");

        for _ in 0..presses {
            session.press_key(BACKSPACE).await?;
            session.wait(self.keystroke_delay).await?;
        }

        session.wait(self.post_delay).await?;
        let final_output = session.read_output().await?;

        let report = DeletionReport {
            initial,
            final_output,
            presses,
        };
        if report.output_persisted() {
            info!(output = %report.final_output, "output persisted after deleting input");
        } else {
            info!("output cleared after deleting input");
        }
        Ok(report)
    }
}
