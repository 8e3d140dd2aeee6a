//! Chapter page scraping: render, dismiss the overlay, collect page images.

use crate::browser::{Browser, Session};
use crate::error::Result;
use mpdl_extract::{Markers, Url};
use std::time::Duration;
use tracing::instrument;

/// How to deal with the overlay that covers chapter pages.
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Exact text of the element that dismisses the overlay.
    pub text: String,
    /// How long to wait for that element to show up.
    pub timeout: Duration,
    /// Pause after dismissing, while the page settles.
    pub settle: Duration,
}
impl Default for Overlay {
    fn default() -> Self {
        Self { text: "Close".to_string(), timeout: Duration::from_secs(10), settle: Duration::from_secs(1) }
    }
}

/// Finds the page images of chapters with a [`Browser`].
pub struct PageScraper<B> {
    browser: B,
    markers: Markers,
    overlay: Overlay,
}
impl<B: Browser> PageScraper<B> {
    pub fn new(browser: B, markers: Markers, overlay: Overlay) -> Self {
        Self { browser, markers, overlay }
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// Renders `url` in a new session and returns its page image URLs in
    /// document order.
    ///
    /// The session lives only for this call. An overlay that is missing or
    /// won't close is not an error; neither is a page without images.
    #[instrument(skip(self), fields(url = %url, images))]
    pub fn image_urls(&self, url: &Url) -> Result<Vec<Url>> {
        let session = self.browser.launch()?;
        session.navigate(url)?;
        match session.click_text(&self.overlay.text, self.overlay.timeout) {
            Ok(true) => {
                tracing::debug!(overlay = %self.overlay.text, "Overlay dismissed");
                std::thread::sleep(self.overlay.settle);
            },
            Ok(false) => tracing::info!(overlay = %self.overlay.text, "Overlay not found; continuing"),
            Err(e) => tracing::info!(overlay = %self.overlay.text, error = ?e, "Could not dismiss overlay; continuing"),
        }
        let html = session.content()?;
        let images = mpdl_extract::image_urls(&html, url, &self.markers);
        if images.is_empty() {
            tracing::warn!("No page images found");
        }
        tracing::Span::current().record("images", images.len());
        Ok(images)
    }
}
