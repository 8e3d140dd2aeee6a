//! Canned HTTP responses for testing.

use crate::client::Fetch;
use crate::error::{ErrorKind, Result};
use mpdl_extract::Url;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned bodies keyed by URL; anything else is a `404`.
///
/// Records every requested URL so tests can assert on what was fetched.
///
/// ```
/// use mpdl_fetch::{Fetch, MockFetcher};
/// use mpdl_extract::Url;
///
/// let fetcher = MockFetcher::new().with("https://example.com/index", "<html></html>");
/// let url = Url::parse("https://example.com/index").unwrap();
/// assert_eq!(fetcher.text(&url).unwrap(), "<html></html>");
/// assert_eq!(fetcher.requests(), ["https://example.com/index"]);
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}
impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a body for a URL.
    ///
    /// Panics if the URL is invalid. If test setup is wrong, then test should
    /// not pass.
    pub fn with(mut self, url: impl AsRef<str>, body: impl Into<Vec<u8>>) -> Self {
        let url = Url::parse(url.as_ref()).expect("mock URL must be valid");
        self.responses.insert(url.into(), body.into());
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn respond(&self, url: &Url) -> Result<Vec<u8>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.responses.get(url.as_str()) {
            Some(body) => Ok(body.clone()),
            None => exn::bail!(ErrorKind::Status { url: url.to_string(), status: 404 }),
        }
    }
}
impl Fetch for MockFetcher {
    fn text(&self, url: &Url) -> Result<String> {
        let body = self.respond(url)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn bytes(&self, url: &Url) -> Result<Vec<u8>> {
        self.respond(url)
    }
}
