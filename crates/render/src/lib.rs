//! Renders chapter pages in a real browser, since their images are only
//! present once the page's scripts have run.

mod browser;
mod chrome;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod scraper;

pub use crate::browser::{Browser, ChromeOptions, ChromeSession, HeadlessChrome, Session};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::{StaticBrowser, StaticSession};
pub use crate::scraper::{Overlay, PageScraper};
