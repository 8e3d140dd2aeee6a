use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use mpdl_extract::Url;
use reqwest::blocking::{Client, Response};
use std::time::Duration;
use tracing::instrument;

/// Anything that can GET a URL.
///
/// The pipeline only ever needs whole bodies, either as text (index pages) or
/// as raw bytes (images).
pub trait Fetch {
    fn text(&self, url: &Url) -> Result<String>;
    fn bytes(&self, url: &Url) -> Result<Vec<u8>>;
}
impl<T: Fetch + ?Sized> Fetch for &T {
    fn text(&self, url: &Url) -> Result<String> {
        (**self).text(url)
    }

    fn bytes(&self, url: &Url) -> Result<Vec<u8>> {
        (**self).bytes(url)
    }
}

/// Blocking HTTP client identifying itself with a browser user agent.
///
/// Non-success statuses are errors; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}
impl HttpClient {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { client })
    }

    fn get(&self, url: &Url) -> Result<Response> {
        let response = self.client.get(url.clone()).send().or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status { url: url.to_string(), status: status.as_u16() });
        }
        Ok(response)
    }
}
impl Fetch for HttpClient {
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    fn text(&self, url: &Url) -> Result<String> {
        self.get(url)?.text().or_raise(|| ErrorKind::Network(url.to_string()))
    }

    #[instrument(level = "debug", skip(self), fields(url = %url, size))]
    fn bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let body = self.get(url)?.bytes().or_raise(|| ErrorKind::Network(url.to_string()))?;
        tracing::Span::current().record("size", body.len());
        Ok(body.to_vec())
    }
}
