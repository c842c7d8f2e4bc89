//! Probe configuration.
//!
//! Everything the harness needs to know about the remote page lives here:
//! where it is, how to find the input control, which anchors bound the output
//! region, how long to wait at each step and how to launch the browser.
//! Defaults reproduce the timings the suites were tuned with against the live
//! site. A config can be loaded from YAML and then overridden from the
//! environment.

use crate::driver::Selector;
use crate::extract::{Anchors, OutputExtractor, Strategy};
use crate::poll::PollConfig;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default translator URL
pub const DEFAULT_BASE_URL: &str = "https://www.swifttranslator.com/";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "SINHALA_PROBE_URL";

/// Environment variable pointing at a Chromium binary
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

/// Environment variable toggling headless mode (`0`/`false` for a visible window)
pub const ENV_HEADLESS: &str = "SINHALA_PROBE_HEADLESS";

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Navigation/load timeout in milliseconds
    pub load_timeout_ms: u64,
    /// How long to keep looking for the input control, in milliseconds
    pub locate_timeout_ms: u64,
    /// Interval between input-control lookups, in milliseconds
    pub locate_interval_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            user_agent: None,
            sandbox: true,
            load_timeout_ms: 30_000,
            locate_timeout_ms: 10_000,
            locate_interval_ms: 50,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Load timeout as Duration
    #[must_use]
    pub const fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Input-control lookup timeout as Duration
    #[must_use]
    pub const fn locate_timeout(&self) -> Duration {
        Duration::from_millis(self.locate_timeout_ms)
    }

    /// Interval between input-control lookups as Duration
    #[must_use]
    pub const fn locate_interval(&self) -> Duration {
        Duration::from_millis(self.locate_interval_ms)
    }
}

/// Waits and extraction strategy for one family of cases
///
/// A profile written in YAML must be complete; there is no single default
/// to fill gaps from, since the two suites differ in every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteProfile {
    /// Pause before the first navigation
    pub pre_navigation_ms: u64,
    /// Pause between clearing and filling the input
    pub clear_pause_ms: u64,
    /// Wait after filling, before the first read
    pub settle_ms: u64,
    /// Extraction strategy
    pub strategy: Strategy,
    /// Polling budget; a single attempt makes this a read-once profile
    pub poll: PollConfig,
    /// Delay between Backspace presses
    pub keystroke_delay_ms: u64,
    /// Wait after the last Backspace, before the final read
    pub post_deletion_ms: u64,
    /// Wait after filling the input ahead of a deletion run
    pub deletion_settle_ms: u64,
}

impl SuiteProfile {
    /// Positive and negative suites: eight attempts, three seconds apart
    #[must_use]
    pub fn functional() -> Self {
        Self {
            pre_navigation_ms: 2_000,
            clear_pause_ms: 500,
            settle_ms: 4_000,
            strategy: Strategy::ScriptAnchored,
            poll: PollConfig::default(),
            keystroke_delay_ms: 300,
            post_deletion_ms: 1_000,
            deletion_settle_ms: 2_000,
        }
    }

    /// UI suite: one read after a short dwell
    #[must_use]
    pub fn ui() -> Self {
        Self {
            pre_navigation_ms: 2_000,
            clear_pause_ms: 200,
            settle_ms: 2_000,
            strategy: Strategy::ChromeStripped,
            poll: PollConfig::once(1_500),
            keystroke_delay_ms: 200,
            post_deletion_ms: 1_000,
            deletion_settle_ms: 3_000,
        }
    }

    /// Set the extraction strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the polling budget
    #[must_use]
    pub const fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Set the settle wait in milliseconds
    #[must_use]
    pub const fn with_settle(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Remove every fixed pause (for scripted drivers)
    #[must_use]
    pub const fn without_pauses(mut self) -> Self {
        self.pre_navigation_ms = 0;
        self.clear_pause_ms = 0;
        self.settle_ms = 0;
        self.keystroke_delay_ms = 0;
        self.post_deletion_ms = 0;
        self.deletion_settle_ms = 0;
        self.poll.dwell_ms = 0;
        self.poll.retry_delay_ms = 0;
        self
    }

    /// Pre-navigation pause
    #[must_use]
    pub const fn pre_navigation(&self) -> Duration {
        Duration::from_millis(self.pre_navigation_ms)
    }

    /// Clear pause
    #[must_use]
    pub const fn clear_pause(&self) -> Duration {
        Duration::from_millis(self.clear_pause_ms)
    }

    /// Settle wait
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Keystroke delay
    #[must_use]
    pub const fn keystroke_delay(&self) -> Duration {
        Duration::from_millis(self.keystroke_delay_ms)
    }

    /// Post-deletion wait
    #[must_use]
    pub const fn post_deletion(&self) -> Duration {
        Duration::from_millis(self.post_deletion_ms)
    }

    /// Wait between filling and the first read of a deletion run
    #[must_use]
    pub const fn deletion_settle(&self) -> Duration {
        Duration::from_millis(self.deletion_settle_ms)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Translator page URL
    pub base_url: String,
    /// Input control selector
    pub input: Selector,
    /// CSS selector whose text content is scanned for output
    pub read_scope: String,
    /// Output region anchors
    pub anchors: Anchors,
    /// Timings for positive and negative cases
    pub functional: SuiteProfile,
    /// Timings for UI cases
    pub ui: SuiteProfile,
    /// Browser launch options
    pub browser: BrowserConfig,
    /// Positive cases must match the expected output exactly
    pub strict: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            input: Selector::default(),
            read_scope: "body".to_string(),
            anchors: Anchors::default(),
            functional: SuiteProfile::functional(),
            ui: SuiteProfile::ui(),
            browser: BrowserConfig::default(),
            strict: false,
        }
    }
}

impl ProbeConfig {
    /// Parse a YAML document; missing fields take their defaults
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH).filter(|v| !v.trim().is_empty()) {
            self.browser.chromium_path = Some(path);
        }
        if let Some(flag) = lookup(ENV_HEADLESS) {
            match flag.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => self.browser.headless = false,
                "1" | "true" | "yes" | "on" => self.browser.headless = true,
                other => tracing::warn!(value = other, "ignoring unrecognized {ENV_HEADLESS}"),
            }
        }
        self
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> ProbeResult<()> {
        if !(self.base_url.starts_with("http://")
            || self.base_url.starts_with("https://")
            || self.base_url.starts_with("file://"))
        {
            return Err(ProbeError::config(format!(
                "base_url must be an http(s) or file URL, got '{}'",
                self.base_url
            )));
        }
        if self.read_scope.trim().is_empty() {
            return Err(ProbeError::config("read_scope must not be empty"));
        }
        if self.input.to_css().trim().is_empty() {
            return Err(ProbeError::config("input selector must not be empty"));
        }
        self.anchors.validate()?;
        for (name, profile) in [("functional", &self.functional), ("ui", &self.ui)] {
            if profile.poll.max_attempts == 0 {
                return Err(ProbeError::config(format!(
                    "{name}.poll.max_attempts must be at least 1"
                )));
            }
        }
        Ok(())
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the input selector
    #[must_use]
    pub fn with_input(mut self, selector: Selector) -> Self {
        self.input = selector;
        self
    }

    /// Set the read scope
    #[must_use]
    pub fn with_read_scope(mut self, scope: impl Into<String>) -> Self {
        self.read_scope = scope.into();
        self
    }

    /// Set the anchors
    #[must_use]
    pub fn with_anchors(mut self, anchors: Anchors) -> Self {
        self.anchors = anchors;
        self
    }

    /// Set the functional profile
    #[must_use]
    pub fn with_functional(mut self, profile: SuiteProfile) -> Self {
        self.functional = profile;
        self
    }

    /// Set the UI profile
    #[must_use]
    pub fn with_ui(mut self, profile: SuiteProfile) -> Self {
        self.ui = profile;
        self
    }

    /// Set browser options
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Require exact matches for positive cases
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Zero every fixed pause in both profiles
    #[must_use]
    pub fn without_pauses(mut self) -> Self {
        self.functional = self.functional.without_pauses();
        self.ui = self.ui.without_pauses();
        self
    }

    /// Extractor for a profile
    #[must_use]
    pub fn extractor(&self, profile: &SuiteProfile) -> OutputExtractor {
        OutputExtractor::with_strategy(self.anchors.clone(), profile.strategy)
    }
}
