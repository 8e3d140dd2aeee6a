//! Chapter URL parsing.
//!
//! Chapter URLs on the site look like `/manga/<title>/<version>/<chapter>`,
//! occasionally with an extra segment after the title
//! (`/manga/<title>/<extra>/<version>/<chapter>`). Anything else means the
//! site changed its URL scheme and is reported as
//! [`UnexpectedUrlShape`](ErrorKind::UnexpectedUrlShape).

use crate::consts::{DEFAULT_BASE_URL, DEFAULT_PATH_PREFIX};
use crate::error::{ErrorKind, Result};
use crate::models::MangaIdentity;
use exn::ResultExt;
use tracing::instrument;
use url::Url;

/// A chapter URL resolved to an absolute URL, plus the identity encoded in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub identity: MangaIdentity,
    pub url: Url,
}

/// Resolves and parses site URLs relative to a base URL.
#[derive(Debug, Clone)]
pub struct UrlParser {
    base: Url,
    prefix: String,
}
impl Default for UrlParser {
    fn default() -> Self {
        // Infallible: constant URL.
        let base = Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid");
        Self::new(base, DEFAULT_PATH_PREFIX)
    }
}
impl UrlParser {
    pub fn new(base: Url, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim().trim_matches('/').to_string();
        Self { base, prefix }
    }

    /// Turns a possibly relative, possibly scheme-less URL into an absolute one.
    ///
    /// ```rust
    /// use mpdl_extract::UrlParser;
    ///
    /// let parser = UrlParser::default();
    /// let url = parser.resolve("/manga/demo/v1/c5").unwrap();
    /// assert_eq!(url.as_str(), "https://mangapark.me/manga/demo/v1/c5");
    /// let url = parser.resolve("mangapark.me/manga/demo/v1/c5").unwrap();
    /// assert_eq!(url.as_str(), "https://mangapark.me/manga/demo/v1/c5");
    /// ```
    pub fn resolve(&self, raw: &str) -> Result<Url> {
        let raw = raw.trim();
        if let Ok(url) = Url::parse(raw)
            && url.has_host()
        {
            return Ok(url);
        }
        // Scheme-relative URLs carry their own host.
        if raw.starts_with("//") {
            return self.base.join(raw).or_raise(|| ErrorKind::InvalidUrl(raw.to_string()));
        }
        let mut relative = raw.trim_start_matches('/');
        if let Some(host) = self.base.host_str()
            && let Some(rest) = relative.strip_prefix(host)
            && (rest.is_empty() || rest.starts_with('/'))
        {
            relative = rest.trim_start_matches('/');
        }
        self.base.join(&format!("/{relative}")).or_raise(|| ErrorKind::InvalidUrl(raw.to_string()))
    }

    /// Extracts the [`MangaIdentity`] from a chapter URL.
    ///
    /// Empty path segments (doubled or trailing slashes) are ignored, as is
    /// the known path prefix. The remaining path must have exactly three or
    /// four segments; with four, the second is dropped.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&self, raw: &str) -> Result<ParsedUrl> {
        let url = self.resolve(raw)?;
        let mut segments: Vec<&str> =
            url.path_segments().map(|s| s.filter(|s| !s.is_empty()).collect()).unwrap_or_default();
        if !self.prefix.is_empty() && segments.first() == Some(&self.prefix.as_str()) {
            segments.remove(0);
        }
        let (title, version, chapter) = match segments.as_slice() {
            [title, version, chapter] => (title, version, chapter),
            [title, _, version, chapter] => (title, version, chapter),
            _ => {
                tracing::error!(url = %url, segments = segments.len(), "Could not parse chapter URL");
                exn::bail!(ErrorKind::UnexpectedUrlShape(url.to_string()));
            },
        };
        let identity = MangaIdentity {
            title: title.to_string(),
            version: version.to_string(),
            chapter: chapter.to_string(),
        };
        Ok(ParsedUrl { identity, url })
    }
}
