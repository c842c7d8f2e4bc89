//! sinhala-probe: Browser-Driven Regression Probes for a Singlish Translator
//!
//! Drives a hosted Singlish-to-Sinhala transliteration page through a real
//! browser, scrapes the rendered text and checks it against curated cases.
//! There is no transliteration engine here; the page under test is external.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────┐   ┌─────────────────┐   ┌──────────┐
//! │ Catalog  │──►│ TranslatorSession│──►│ TranslatorDriver│──►│ Chromium │
//! │ (YAML)   │   │ clear/fill/poll  │   │ (CDP or mock)   │   │  (CDP)   │
//! └──────────┘   └────────┬─────────┘   └─────────────────┘   └──────────┘
//!                         │ page text
//!                         ▼
//!                ┌──────────────────┐   ┌──────────┐
//!                │ OutputExtractor  │──►│ Verdict  │
//!                │ label … marker   │   │          │
//!                └──────────────────┘   └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sinhala_probe::{MockDriver, ProbeConfig, TranslatorSession};
//!
//! # async fn demo() -> sinhala_probe::ProbeResult<()> {
//! let driver = MockDriver::with_frames(["Sinhala අපි බත් කනවා 🔁 Copy"]);
//! let mut session = TranslatorSession::new(driver, ProbeConfig::default());
//! session.open().await?;
//! let output = session.convert_and_read("api bath kanavaa").await?;
//! assert_eq!(output, "අපි බත් කනවා");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

#[cfg(feature = "browser")]
mod browser;
mod catalog;
mod config;
mod deletion;
mod driver;
mod extract;
mod poll;
mod result;
mod runner;
mod sample;
mod script;
mod session;
mod verdict;

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use catalog::{Catalog, SuiteDocument, CATALOG_VERSION};
pub use config::{
    BrowserConfig, ProbeConfig, SuiteProfile, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_CHROMIUM_PATH,
    ENV_HEADLESS,
};
pub use deletion::{DeletionReport, DeletionSimulator};
pub use driver::{ElementHandle, MockDriver, Selector, TranslatorDriver, BACKSPACE};
pub use extract::{Anchors, OutputExtractor, Strategy, DEFAULT_LABEL, DEFAULT_MARKER};
pub use poll::{
    poll_output, read_once, PollConfig, PollOutcome, DEFAULT_DWELL_MS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RETRY_DELAY_MS,
};
pub use result::{ProbeError, ProbeResult};
pub use runner::{run_case, CaseReport};
pub use sample::{Check, LengthClass, Sample, SuiteKind};
pub use script::{contains_script, first_script_index, has_sinhala, ScriptRange};
pub use session::TranslatorSession;
pub use verdict::{evaluate, Assertion, AssertionResult, Evidence, Verdict};

/// Open a Chromium-backed session using `config`
#[cfg(feature = "browser")]
pub async fn launch_session(config: ProbeConfig) -> ProbeResult<TranslatorSession<ChromiumDriver>> {
    let driver = ChromiumDriver::launch(&config.browser).await?;
    let mut session = TranslatorSession::new(driver, config);
    if let Err(e) = session.open().await {
        if let Err(close_err) = session.close().await {
            tracing::debug!(error = %close_err, "session close failed");
        }
        return Err(e);
    }
    Ok(session)
}

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        evaluate, run_case, Catalog, Check, Evidence, MockDriver, PollConfig, ProbeConfig,
        ProbeError, ProbeResult, Sample, SuiteKind, TranslatorDriver, TranslatorSession, Verdict,
    };
    #[cfg(feature = "browser")]
    pub use super::{launch_session, ChromiumDriver};
}
