//! Real browser control over CDP.
//!
//! [`ChromiumDriver`] launches Chromium through chromiumoxide and implements
//! [`TranslatorDriver`] against a single page. Elements are addressed by CSS
//! selector on every call, so re-rendering the input control between steps
//! is harmless.

use crate::config::BrowserConfig;
use crate::driver::{ElementHandle, Selector, TranslatorDriver};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, InsertTextParams,
};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Interval between `document.readyState` checks
const READY_POLL: Duration = Duration::from_millis(100);

/// Quiet period with no new resource entries before the page counts as idle
const NETWORK_QUIET: Duration = Duration::from_millis(500);

const RESOURCE_COUNT: &str = "performance.getEntriesByType('resource').length";

/// Windows virtual key codes for the named keys the harness presses
fn key_code(key: &str) -> Option<i64> {
    match key {
        "Backspace" => Some(8),
        "Tab" => Some(9),
        "Enter" => Some(13),
        "Escape" => Some(27),
        "Delete" => Some(46),
        _ => None,
    }
}

/// Quote a string as a JavaScript literal
fn js_string(value: &str) -> ProbeResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Chromium page driven over CDP
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    load_timeout: Duration,
}

impl ChromiumDriver {
    /// Launch a browser and open a blank page
    pub async fn launch(config: &BrowserConfig) -> ProbeResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.load_timeout())
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|message| {
            if message.contains("auto detect") {
                ProbeError::BrowserNotFound
            } else {
                ProbeError::BrowserLaunch { message }
            }
        })?;

        let (browser, mut handler) =
            Browser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser event error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProbeError::BrowserLaunch {
                message: e.to_string(),
            })?;

        if let Some(ref ua) = config.user_agent {
            page.execute(SetUserAgentOverrideParams::new(ua.clone()))
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            browser,
            page,
            handler,
            load_timeout: config.load_timeout(),
        })
    }

    /// Evaluate an expression and deserialize its value
    async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> ProbeResult<T> {
        let result = self
            .page
            .evaluate(expr)
            .await
            .map_err(|e| ProbeError::read(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| ProbeError::read(e.to_string()))
    }

    /// Focus the element and select its contents; false if it is gone
    async fn focus_and_select(&self, handle: &ElementHandle) -> ProbeResult<()> {
        let expr = format!(
            "(() => {{ const el = document.querySelector({}); \
             if (!el) return false; el.focus(); \
             if (typeof el.select === 'function') el.select(); return true; }})()",
            js_string(&handle.selector)?
        );
        let found: bool = self.eval(&expr).await.map_err(|e| ProbeError::input(e.to_string()))?;
        if found {
            Ok(())
        } else {
            Err(ProbeError::ElementNotFound {
                selector: handle.selector.clone(),
            })
        }
    }

    async fn dispatch_key(&self, kind: DispatchKeyEventType, key: &str, code: i64) -> ProbeResult<()> {
        let params = DispatchKeyEventParams::builder()
            .r#type(kind)
            .key(key)
            .code(key)
            .windows_virtual_key_code(code)
            .native_virtual_key_code(code)
            .build()
            .map_err(ProbeError::input)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| ProbeError::input(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TranslatorDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        debug!(url, "navigating");
        let goto = tokio::time::timeout(self.load_timeout, self.page.goto(url));
        match goto.await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ProbeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(ProbeError::Navigation {
                url: url.to_string(),
                message: format!("timed out after {:?}", self.load_timeout),
            }),
        }
    }

    async fn wait_for_load(&mut self) -> ProbeResult<()> {
        let page = &self.page;
        let ready = async {
            page.wait_for_navigation()
                .await
                .map_err(|e| ProbeError::Wait {
                    message: e.to_string(),
                })?;
            loop {
                let state = match page.evaluate("document.readyState").await {
                    Ok(result) => result.into_value::<String>().unwrap_or_default(),
                    Err(_) => String::new(),
                };
                if state == "complete" {
                    break;
                }
                tokio::time::sleep(READY_POLL).await;
            }
            // Client-rendered pages keep fetching after load; wait for a quiet period
            let mut last: Option<u64> = None;
            loop {
                let count = match page.evaluate(RESOURCE_COUNT).await {
                    Ok(result) => result.into_value::<u64>().ok(),
                    Err(_) => None,
                };
                if count.is_some() && count == last {
                    return Ok::<(), ProbeError>(());
                }
                last = count;
                tokio::time::sleep(NETWORK_QUIET).await;
            }
        };
        tokio::time::timeout(self.load_timeout, ready)
            .await
            .map_err(|_| ProbeError::Wait {
                message: format!("page did not finish loading within {:?}", self.load_timeout),
            })?
    }

    async fn locate(&mut self, selector: &Selector) -> ProbeResult<ElementHandle> {
        let css = selector.to_css();
        let expr = format!(
            "(() => {{ const el = document.querySelector({}); \
             return el ? el.tagName.toLowerCase() : null; }})()",
            js_string(&css)?
        );
        let tag: Option<String> = self.eval(&expr).await?;
        match tag {
            Some(tag) => Ok(ElementHandle::new(css, tag)),
            None => Err(ProbeError::ElementNotFound { selector: css }),
        }
    }

    async fn fill(&mut self, handle: &ElementHandle, text: &str) -> ProbeResult<()> {
        self.focus_and_select(handle).await?;
        if text.is_empty() {
            return self.press_key("Backspace").await;
        }
        self.page
            .execute(InsertTextParams::new(text))
            .await
            .map_err(|e| ProbeError::input(e.to_string()))?;
        Ok(())
    }

    async fn clear(&mut self, handle: &ElementHandle) -> ProbeResult<()> {
        self.focus_and_select(handle).await?;
        self.press_key("Backspace").await
    }

    async fn press_key(&mut self, key: &str) -> ProbeResult<()> {
        if let Some(code) = key_code(key) {
            self.dispatch_key(DispatchKeyEventType::KeyDown, key, code).await?;
            return self.dispatch_key(DispatchKeyEventType::KeyUp, key, code).await;
        }
        if key.chars().count() == 1 {
            self.page
                .execute(InsertTextParams::new(key))
                .await
                .map_err(|e| ProbeError::input(e.to_string()))?;
            return Ok(());
        }
        Err(ProbeError::input(format!("unsupported key '{key}'")))
    }

    async fn read_text(&mut self, scope: &str) -> ProbeResult<String> {
        let expr = format!(
            "(() => {{ const el = document.querySelector({}); \
             return el ? el.textContent : null; }})()",
            js_string(scope)?
        );
        let text: Option<String> = self.eval(&expr).await?;
        text.ok_or_else(|| ProbeError::ElementNotFound {
            selector: scope.to_string(),
        })
    }

    async fn wait(&mut self, duration: Duration) -> ProbeResult<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser did not close cleanly");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "browser process wait failed");
        }
        self.handler.abort();
        Ok(())
    }
}
