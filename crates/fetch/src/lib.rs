//! Blocking HTTP for index pages and page images.

mod client;
pub mod error;
mod image;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use crate::client::{Fetch, HttpClient};
pub use crate::image::{ImageAsset, download_image, file_name};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockFetcher;
