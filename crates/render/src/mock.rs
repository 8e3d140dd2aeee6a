//! Canned browser for testing.

use crate::browser::{Browser, Session};
use crate::error::{ErrorKind, Result};
use mpdl_extract::Url;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Shared {
    launches: AtomicUsize,
    open: AtomicUsize,
    visited: Mutex<Vec<String>>,
}

/// A [`Browser`] that serves fixed markup per URL.
///
/// A page "contains" a clickable element when its markup has the text wrapped
/// directly in tags (`>Close<`). Sessions are counted, so tests can check
/// that none outlive a scrape.
///
/// ```
/// use mpdl_render::{Browser, Session, StaticBrowser};
/// use mpdl_extract::Url;
///
/// let url = Url::parse("https://example.com/c1").unwrap();
/// let browser = StaticBrowser::new().with_page(url.as_str(), "<img src='a.jpg'>");
/// {
///     let session = browser.launch().unwrap();
///     session.navigate(&url).unwrap();
///     assert!(session.content().unwrap().contains("a.jpg"));
///     assert_eq!(browser.open_sessions(), 1);
/// }
/// assert_eq!(browser.open_sessions(), 0);
/// ```
#[derive(Default)]
pub struct StaticBrowser {
    pages: Arc<HashMap<String, String>>,
    unavailable: bool,
    broken_clicks: bool,
    shared: Arc<Shared>,
}

impl StaticBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A browser that fails every launch, as if Chrome were not installed.
    pub fn unavailable() -> Self {
        Self { unavailable: true, ..Self::default() }
    }

    /// A browser whose sessions fail every click, as if the overlay were
    /// covered or detached.
    pub fn with_broken_clicks(mut self) -> Self {
        self.broken_clicks = true;
        self
    }

    /// Panics if `url` is not a valid URL.
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        let url = Url::parse(url).expect("mock page URL must be valid");
        Arc::make_mut(&mut self.pages).insert(url.into(), html.into());
        self
    }

    pub fn launches(&self) -> usize {
        self.shared.launches.load(Ordering::SeqCst)
    }

    pub fn open_sessions(&self) -> usize {
        self.shared.open.load(Ordering::SeqCst)
    }

    /// Every URL navigated to, across all sessions.
    pub fn visited(&self) -> Vec<String> {
        self.shared.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Browser for StaticBrowser {
    type Session = StaticSession;

    fn launch(&self) -> Result<StaticSession> {
        if self.unavailable {
            exn::bail!(ErrorKind::ChromeNotFound);
        }
        self.shared.launches.fetch_add(1, Ordering::SeqCst);
        self.shared.open.fetch_add(1, Ordering::SeqCst);
        Ok(StaticSession {
            pages: Arc::clone(&self.pages),
            broken_clicks: self.broken_clicks,
            shared: Arc::clone(&self.shared),
            current: Mutex::default(),
        })
    }
}

pub struct StaticSession {
    pages: Arc<HashMap<String, String>>,
    broken_clicks: bool,
    shared: Arc<Shared>,
    current: Mutex<Option<String>>,
}

impl StaticSession {
    fn page(&self) -> Option<String> {
        let current = self.current.lock().ok()?.clone()?;
        self.pages.get(&current).cloned()
    }
}

impl Session for StaticSession {
    fn navigate(&self, url: &Url) -> Result<()> {
        if let Ok(mut visited) = self.shared.visited.lock() {
            visited.push(url.to_string());
        }
        if !self.pages.contains_key(url.as_str()) {
            exn::bail!(ErrorKind::Navigation(url.to_string()));
        }
        if let Ok(mut current) = self.current.lock() {
            *current = Some(url.to_string());
        }
        Ok(())
    }

    fn click_text(&self, text: &str, _timeout: Duration) -> Result<bool> {
        if self.broken_clicks {
            exn::bail!(ErrorKind::Interaction(text.to_string()));
        }
        Ok(self.page().is_some_and(|html| html.contains(&format!(">{text}<"))))
    }

    fn content(&self) -> Result<String> {
        match self.page() {
            Some(html) => Ok(html),
            None => exn::bail!(ErrorKind::Content("about:blank".to_string())),
        }
    }
}

impl Drop for StaticSession {
    fn drop(&mut self) {
        self.shared.open.fetch_sub(1, Ordering::SeqCst);
    }
}
