//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use mpdl_extract::models::ChapterNumber;
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("issue with path generation from template")]
    Template,
    /// A URL does not have the shape the site uses; the site probably changed.
    #[display("could not parse URL: {_0}")]
    Parse(#[error(not(source))] String),
    #[display("could not list chapters from: {_0}")]
    Listing(#[error(not(source))] String),
    #[display("invalid chapter selection: {_0}")]
    InvalidSelection(#[error(not(source))] String),
    #[display("chapter range is reversed: {start} > {end}")]
    ReversedRange { start: ChapterNumber, end: ChapterNumber },
    /// No browser is available, so no chapter can be rendered.
    #[display("browser unavailable")]
    BrowserUnavailable,
    #[display("could not render chapter page: {_0}")]
    Scrape(#[error(not(source))] String),
    #[display("could not download image: {_0}")]
    Download(#[error(not(source))] String),
    #[display("could not resize image: {}", _0.display())]
    Resize(#[error(not(source))] PathBuf),
    #[display("could not create chapter PDF: {}", _0.display())]
    Package(#[error(not(source))] PathBuf),
    #[display("could not create archive: {}", _0.display())]
    Archive(#[error(not(source))] PathBuf),
    #[display("invalid configuration")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Listing(_) | Self::Download(_) | Self::Scrape(_))
    }

    /// Returns `true` when the whole run must stop, rather than only the
    /// chapter being processed.
    pub fn aborts_run(&self) -> bool {
        matches!(self, Self::Template | Self::Parse(_) | Self::BrowserUnavailable)
    }
}
