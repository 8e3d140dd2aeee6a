use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use mpdl_extract::{Listing, Markers, Url};
use mpdl_fetch::Fetch;
use tracing::instrument;

/// Downloads a manga's index page and extracts its chapter links.
#[instrument(skip(fetch, markers), fields(url = %index))]
pub fn list_chapters(fetch: &impl Fetch, index: &Url, markers: &Markers) -> Result<Listing> {
    let html = fetch.text(index).or_raise(|| ErrorKind::Listing(index.to_string()))?;
    let listing = mpdl_extract::chapters(&html, index, markers);
    if !listing.skipped.is_empty() {
        tracing::warn!(skipped = listing.skipped.len(), "Some chapter links were skipped");
    }
    tracing::info!(chapters = listing.chapters.len(), "Chapters listed");
    Ok(listing)
}
