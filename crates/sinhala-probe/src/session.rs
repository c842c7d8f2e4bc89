//! Translator page session.
//!
//! A session owns one driver (one page) and the configuration it was opened
//! with. Each conversion clears the input, types the new text, lets the page
//! settle and then reads the output either by polling (functional profile)
//! or with a single read (UI profile).

use crate::config::{ProbeConfig, SuiteProfile};
use crate::driver::{ElementHandle, TranslatorDriver};
use crate::poll::{poll_output, read_once, PollOutcome};
use crate::result::ProbeResult;
use std::time::Duration;
use tracing::{debug, info};

/// An open translator page
#[derive(Debug)]
pub struct TranslatorSession<D: TranslatorDriver> {
    driver: D,
    config: ProbeConfig,
    input: Option<ElementHandle>,
}

impl<D: TranslatorDriver> TranslatorSession<D> {
    /// Wrap a driver; call [`Self::open`] before converting
    #[must_use]
    pub const fn new(driver: D, config: ProbeConfig) -> Self {
        Self {
            driver,
            config,
            input: None,
        }
    }

    /// Pause, navigate to the base URL and wait for the page to load
    pub async fn open(&mut self) -> ProbeResult<()> {
        let pause = self.config.functional.pre_navigation();
        if !pause.is_zero() {
            self.driver.wait(pause).await?;
        }
        info!(url = %self.config.base_url, "opening translator");
        self.driver.navigate(&self.config.base_url).await?;
        self.driver.wait_for_load().await?;
        self.input = None;
        Ok(())
    }

    /// Convert `input` and poll for the output with the functional profile
    pub async fn convert_and_read(&mut self, input: &str) -> ProbeResult<String> {
        let profile = self.config.functional.clone();
        Ok(self.convert_with(&profile, input).await?.output)
    }

    /// Convert `input` and read the output once with the UI profile
    pub async fn convert_once(&mut self, input: &str) -> ProbeResult<String> {
        let profile = self.config.ui.clone();
        Ok(self.convert_with(&profile, input).await?.output)
    }

    /// Clear, pause, fill, settle, then read according to `profile`
    pub async fn convert_with(
        &mut self,
        profile: &SuiteProfile,
        input: &str,
    ) -> ProbeResult<PollOutcome> {
        self.clear().await?;
        self.driver.wait(profile.clear_pause()).await?;
        self.fill(input).await?;
        self.driver.wait(profile.settle()).await?;

        let extractor = self.config.extractor(profile);
        let outcome = poll_output(
            &mut self.driver,
            &self.config.read_scope,
            &extractor,
            &profile.poll,
        )
        .await?;

        info!(input, output = %outcome.output, attempts = outcome.attempts, "converted");
        Ok(outcome)
    }

    /// Fill `input` without clearing first, then wait `settle`
    pub async fn fill_and_settle(&mut self, input: &str, settle: Duration) -> ProbeResult<()> {
        self.fill(input).await?;
        self.driver.wait(settle).await
    }

    /// Single read of the current output with the UI profile
    pub async fn read_output(&mut self) -> ProbeResult<String> {
        let extractor = self.config.extractor(&self.config.ui);
        let dwell = self.config.ui.poll.dwell();
        read_once(&mut self.driver, &self.config.read_scope, &extractor, dwell).await
    }

    /// Replace the input control's value
    pub async fn fill(&mut self, input: &str) -> ProbeResult<()> {
        let handle = self.input_handle().await?;
        self.driver.fill(&handle, input).await
    }

    /// Empty the input control
    pub async fn clear(&mut self) -> ProbeResult<()> {
        let handle = self.input_handle().await?;
        self.driver.clear(&handle).await
    }

    /// Press a key on the focused input
    pub async fn press_key(&mut self, key: &str) -> ProbeResult<()> {
        self.driver.press_key(key).await
    }

    /// Suspend through the driver
    pub async fn wait(&mut self, duration: Duration) -> ProbeResult<()> {
        self.driver.wait(duration).await
    }

    /// Close the page
    pub async fn close(&mut self) -> ProbeResult<()> {
        self.driver.close().await
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Underlying driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back
    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }

    async fn input_handle(&mut self) -> ProbeResult<ElementHandle> {
        if let Some(handle) = &self.input {
            return Ok(handle.clone());
        }
        debug!(selector = %self.config.input, "locating input");
        let browser = &self.config.browser;
        let handle = self
            .driver
            .wait_for_selector(
                &self.config.input,
                browser.locate_timeout(),
                browser.locate_interval(),
            )
            .await?;
        self.input = Some(handle.clone());
        Ok(handle)
    }
}
