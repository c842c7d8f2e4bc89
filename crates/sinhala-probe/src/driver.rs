//! TranslatorDriver - Browser Capability Interface
//!
//! Every interaction with the remote translator goes through this trait:
//! navigation, locating the input control, filling/clearing it, key presses,
//! reading rendered text and timed waits. The extraction and polling logic
//! only ever sees this boundary.
//!
//! # Implementations
//!
//! - [`MockDriver`] - Scripted page text for unit testing
//! - `ChromiumDriver` - CDP via chromiumoxide (`browser` feature)

use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Backspace key name
pub const BACKSPACE: &str = "Backspace";

/// How to find an element on the page
///
/// In YAML a selector is either a bare CSS string, `css: <selector>`, or
/// `placeholder: { tag, fragment }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectorRepr", into = "SelectorRepr")]
pub enum Selector {
    /// Raw CSS selector
    Css(String),
    /// Element whose placeholder attribute contains a substring
    Placeholder {
        /// Tag name, e.g. `textarea`
        tag: String,
        /// Substring of the placeholder text
        fragment: String,
    },
}

/// Wire form of [`Selector`]; map keys instead of enum tags
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SelectorRepr {
    Bare(String),
    Css { css: String },
    Placeholder { placeholder: PlaceholderFields },
}

#[derive(Serialize, Deserialize)]
struct PlaceholderFields {
    tag: String,
    fragment: String,
}

impl From<SelectorRepr> for Selector {
    fn from(repr: SelectorRepr) -> Self {
        match repr {
            SelectorRepr::Bare(css) | SelectorRepr::Css { css } => Self::Css(css),
            SelectorRepr::Placeholder {
                placeholder: PlaceholderFields { tag, fragment },
            } => Self::Placeholder { tag, fragment },
        }
    }
}

impl From<Selector> for SelectorRepr {
    fn from(selector: Selector) -> Self {
        match selector {
            Selector::Css(css) => Self::Css { css },
            Selector::Placeholder { tag, fragment } => Self::Placeholder {
                placeholder: PlaceholderFields { tag, fragment },
            },
        }
    }
}

impl Selector {
    /// CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Placeholder-substring selector
    #[must_use]
    pub fn placeholder(tag: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::Placeholder {
            tag: tag.into(),
            fragment: fragment.into(),
        }
    }

    /// Render as a CSS selector string
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::Placeholder { tag, fragment } => {
                let escaped = fragment.replace('\\', "\\\\").replace('"', "\\\"");
                format!("{tag}[placeholder*=\"{escaped}\"]")
            }
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::placeholder("textarea", "Singlish")
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Handle to a located element
///
/// Handles are lazy: they carry the selector and are re-resolved on use, so
/// a re-rendered input control does not invalidate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// CSS selector the element was located with
    pub selector: String,
    /// Element tag name (lowercase)
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(selector: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag_name: tag_name.into(),
        }
    }
}

/// Abstract driver for the translator page
#[async_trait]
pub trait TranslatorDriver: Send {
    /// Navigate to URL
    async fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Wait until the page has finished loading
    async fn wait_for_load(&mut self) -> ProbeResult<()>;

    /// Locate an element
    async fn locate(&mut self, selector: &Selector) -> ProbeResult<ElementHandle>;

    /// Replace the element's value with `text`
    async fn fill(&mut self, handle: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Empty the element's value
    async fn clear(&mut self, handle: &ElementHandle) -> ProbeResult<()>;

    /// Press and release a key on the focused element
    async fn press_key(&mut self, key: &str) -> ProbeResult<()>;

    /// Full text content of the first element matching `scope`
    async fn read_text(&mut self, scope: &str) -> ProbeResult<String>;

    /// Suspend for `duration`
    async fn wait(&mut self, duration: Duration) -> ProbeResult<()>;

    /// Close the page and browser
    async fn close(&mut self) -> ProbeResult<()>;

    /// Locate an element, retrying every `interval` until it appears
    ///
    /// Gives up with [`ProbeError::ElementNotFound`] once `timeout` worth of
    /// intervals has been waited. Other errors are returned immediately.
    async fn wait_for_selector(
        &mut self,
        selector: &Selector,
        timeout: Duration,
        interval: Duration,
    ) -> ProbeResult<ElementHandle> {
        let mut waited = Duration::ZERO;
        loop {
            match self.locate(selector).await {
                Err(ProbeError::ElementNotFound { .. }) if waited < timeout => {
                    self.wait(interval).await?;
                    waited += interval.max(Duration::from_millis(1));
                }
                other => return other,
            }
        }
    }
}

/// Source of page text for [`MockDriver`]
enum PageSource {
    /// Fixed sequence of reads; the last one repeats once exhausted
    Frames(VecDeque<Result<String, String>>),
    /// Page text computed from the current input value
    Renderer(Box<dyn Fn(&str) -> String + Send + Sync>),
}

impl fmt::Debug for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frames(frames) => f.debug_tuple("Frames").field(&frames.len()).finish(),
            Self::Renderer(_) => f.write_str("Renderer"),
        }
    }
}

/// Mock driver for unit testing
///
/// Tracks the input value the way a text area would (fill replaces, clear
/// empties, Backspace drops the last character) and adds up requested waits
/// instead of sleeping.
#[derive(Debug)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    /// Current value of the input control
    pub input_value: String,
    /// Selectors that resolve to an element
    pub elements: Vec<String>,
    /// Call history for verification
    pub call_history: Vec<String>,
    /// Sum of all requested waits
    pub waited: Duration,
    /// Number of page-text reads served
    pub reads: usize,
    /// Lookups that still miss before the elements are rendered
    pub pending_lookups: usize,
    source: PageSource,
    real_sleep: bool,
    last_frame: Option<Result<String, String>>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::with_frames(Vec::<&str>::new())
    }
}

impl MockDriver {
    /// Create new mock driver with an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the given page texts in order
    #[must_use]
    pub fn with_frames<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_results(frames.into_iter().map(|s| Ok(s.into())))
    }

    /// Serve page texts or read faults in order
    #[must_use]
    pub fn with_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<String, String>>,
    {
        Self::from_source(PageSource::Frames(results.into_iter().collect()))
    }

    /// Render page text from the current input value
    #[must_use]
    pub fn with_renderer<F>(render: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::from_source(PageSource::Renderer(Box::new(render)))
    }

    fn from_source(source: PageSource) -> Self {
        Self {
            current_url: String::new(),
            input_value: String::new(),
            elements: vec![Selector::default().to_css()],
            call_history: Vec::new(),
            waited: Duration::ZERO,
            reads: 0,
            pending_lookups: 0,
            source,
            real_sleep: false,
            last_frame: None,
        }
    }

    /// Actually sleep in [`TranslatorDriver::wait`] (for paused-clock tests)
    #[must_use]
    pub const fn sleeping(mut self) -> Self {
        self.real_sleep = true;
        self
    }

    /// Render the elements only after `lookups` failed lookups
    #[must_use]
    pub const fn with_late_elements(mut self, lookups: usize) -> Self {
        self.pending_lookups = lookups;
        self
    }

    /// Make another selector resolvable
    pub fn add_element(&mut self, selector: impl Into<String>) {
        self.elements.push(selector.into());
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    /// Count calls to a method
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.call_history
            .iter()
            .filter(|c| c.split(':').next() == Some(method))
            .count()
    }

    fn next_frame(&mut self) -> Result<String, String> {
        match &mut self.source {
            PageSource::Renderer(render) => Ok(render(&self.input_value)),
            PageSource::Frames(frames) => {
                if let Some(frame) = frames.pop_front() {
                    self.last_frame = Some(frame.clone());
                    frame
                } else {
                    self.last_frame.clone().unwrap_or_else(|| Ok(String::new()))
                }
            }
        }
    }

    fn check_handle(&self, handle: &ElementHandle) -> ProbeResult<()> {
        if self.elements.iter().any(|e| *e == handle.selector) {
            Ok(())
        } else {
            Err(ProbeError::ElementNotFound {
                selector: handle.selector.clone(),
            })
        }
    }
}

#[async_trait]
impl TranslatorDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.call_history.push(format!("navigate:{url}"));
        self.current_url = url.to_string();
        Ok(())
    }

    async fn wait_for_load(&mut self) -> ProbeResult<()> {
        self.call_history.push("wait_for_load".to_string());
        Ok(())
    }

    async fn locate(&mut self, selector: &Selector) -> ProbeResult<ElementHandle> {
        let css = selector.to_css();
        self.call_history.push(format!("locate:{css}"));
        if self.pending_lookups > 0 {
            self.pending_lookups -= 1;
            return Err(ProbeError::ElementNotFound { selector: css });
        }
        if self.elements.contains(&css) {
            let tag = css
                .split(|c: char| !c.is_ascii_alphanumeric())
                .next()
                .unwrap_or_default()
                .to_string();
            Ok(ElementHandle::new(css, tag))
        } else {
            Err(ProbeError::ElementNotFound { selector: css })
        }
    }

    async fn fill(&mut self, handle: &ElementHandle, text: &str) -> ProbeResult<()> {
        self.check_handle(handle)?;
        self.call_history.push(format!("fill:{text}"));
        self.input_value = text.to_string();
        Ok(())
    }

    async fn clear(&mut self, handle: &ElementHandle) -> ProbeResult<()> {
        self.check_handle(handle)?;
        self.call_history.push("clear".to_string());
        self.input_value.clear();
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> ProbeResult<()> {
        self.call_history.push(format!("press_key:{key}"));
        if key == BACKSPACE {
            self.input_value.pop();
        }
        Ok(())
    }

    async fn read_text(&mut self, scope: &str) -> ProbeResult<String> {
        self.call_history.push(format!("read_text:{scope}"));
        self.reads += 1;
        self.next_frame().map_err(ProbeError::read)
    }

    async fn wait(&mut self, duration: Duration) -> ProbeResult<()> {
        self.call_history
            .push(format!("wait:{}", duration.as_millis()));
        self.waited += duration;
        if self.real_sleep {
            tokio::time::sleep(duration).await;
        }
        Ok(())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.call_history.push("close".to_string());
        Ok(())
    }
}
