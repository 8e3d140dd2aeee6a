//! Parsing of the manga site's URLs and markup.
//!
//! Everything here is pure: callers fetch or render the HTML, this crate only
//! turns it into [`ChapterRef`](models::ChapterRef)s, page image URLs and
//! [`MangaIdentity`](models::MangaIdentity)s. The site-specific markers are
//! bundled in [`Markers`] so that markup changes stay out of pipeline code.

mod address;
mod consts;
pub mod error;
mod images;
mod listing;
mod markers;
pub mod models;

pub use crate::address::{ParsedUrl, UrlParser};
pub use crate::consts::{
    DEFAULT_BASE_URL, DEFAULT_CHAPTER_CONTAINER, DEFAULT_CHAPTER_LINK, DEFAULT_PAGE_IMAGE, DEFAULT_PATH_PREFIX,
};
pub use crate::images::{image_urls, strip_parameters};
pub use crate::listing::{Listing, chapters, parse_chapter_label};
pub use crate::markers::Markers;
pub use url::Url;
