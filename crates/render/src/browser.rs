//! The browser capability and its headless Chrome implementation.

use crate::chrome;
use crate::error::{ErrorKind, Result, driver};
use exn::ResultExt;
use headless_chrome::{LaunchOptions, Tab};
use mpdl_extract::Url;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::instrument;

/// Something that can start browser sessions.
pub trait Browser {
    type Session: Session;

    /// Starts a fresh session. Dropping the session terminates it.
    fn launch(&self) -> Result<Self::Session>;
}

/// A single live page in a browser.
pub trait Session {
    /// Loads `url` and waits for navigation to finish.
    fn navigate(&self, url: &Url) -> Result<()>;

    /// Waits up to `timeout` for an element whose text is exactly `text` and
    /// clicks it. Returns `false` when no such element appeared in time.
    fn click_text(&self, text: &str, timeout: Duration) -> Result<bool>;

    /// The current rendered markup of the page.
    fn content(&self) -> Result<String>;
}

/// Launch settings for [`HeadlessChrome`].
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub window_size: (u32, u32),
}
impl Default for ChromeOptions {
    fn default() -> Self {
        Self { executable: None, headless: true, window_size: (1920, 1080) }
    }
}

/// Chrome/Chromium driven over the DevTools protocol.
///
/// The executable is looked up on the first launch and remembered, so a
/// machine without Chrome can still run everything that renders nothing.
#[derive(Debug)]
pub struct HeadlessChrome {
    options: ChromeOptions,
    executable: OnceLock<PathBuf>,
}
impl HeadlessChrome {
    pub fn new(options: ChromeOptions) -> Self {
        Self { options, executable: OnceLock::new() }
    }

    fn executable(&self) -> Result<&Path> {
        if let Some(path) = self.executable.get() {
            return Ok(path);
        }
        let found = chrome::discover(self.options.executable.as_deref())?;
        Ok(self.executable.get_or_init(|| found))
    }
}
impl Browser for HeadlessChrome {
    type Session = ChromeSession;

    #[instrument(skip(self), fields(executable))]
    fn launch(&self) -> Result<ChromeSession> {
        let executable = self.executable()?;
        tracing::Span::current().record("executable", tracing::field::display(executable.display()));
        let options = LaunchOptions::default_builder()
            .headless(self.options.headless)
            .window_size(Some(self.options.window_size))
            .path(Some(executable.to_path_buf()))
            .build()
            .map_err(driver)
            .or_raise(|| ErrorKind::Launch)?;
        let browser = headless_chrome::Browser::new(options).map_err(driver).or_raise(|| ErrorKind::Launch)?;
        let tab = browser.new_tab().map_err(driver).or_raise(|| ErrorKind::Launch)?;
        tracing::debug!("Browser session started");
        Ok(ChromeSession { tab, _browser: browser })
    }
}

/// One Chrome process with a single tab. The process is killed on drop.
pub struct ChromeSession {
    tab: Arc<Tab>,
    _browser: headless_chrome::Browser,
}
impl std::fmt::Debug for ChromeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeSession").finish_non_exhaustive()
    }
}
impl Session for ChromeSession {
    fn navigate(&self, url: &Url) -> Result<()> {
        self.tab
            .navigate_to(url.as_str())
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(driver)
            .or_raise(|| ErrorKind::Navigation(url.to_string()))?;
        Ok(())
    }

    fn click_text(&self, text: &str, timeout: Duration) -> Result<bool> {
        let xpath = format!("//*[text()={}]", xpath_literal(text));
        let Ok(element) = self.tab.wait_for_xpath_with_custom_timeout(&xpath, timeout) else {
            return Ok(false);
        };
        element.click().map_err(driver).or_raise(|| ErrorKind::Interaction(xpath.clone()))?;
        Ok(true)
    }

    fn content(&self) -> Result<String> {
        self.tab.get_content().map_err(driver).or_raise(|| ErrorKind::Content(self.tab.get_url()))
    }
}
impl Drop for ChromeSession {
    fn drop(&mut self) {
        tracing::debug!("Browser session closed");
    }
}

/// Quotes `text` as an XPath 1.0 string literal, which has no escapes.
fn xpath_literal(text: &str) -> String {
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    let parts: Vec<String> = text.split('"').map(|part| format!("\"{part}\"")).collect();
    format!("concat({})", parts.join(", '\"', "))
}
