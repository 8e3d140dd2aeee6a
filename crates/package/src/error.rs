//! Packaging Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A packaging error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not read: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The file is not an image in a supported format.
    #[display("could not decode image: {}", _0.display())]
    Decode(#[error(not(source))] PathBuf),
    #[display("could not encode image: {}", _0.display())]
    Encode(#[error(not(source))] PathBuf),
    #[display("could not write: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
    #[display("target height must be at least one pixel")]
    InvalidHeight,
    /// A PDF needs at least one page.
    #[display("no images to package")]
    NoPages,
    #[display("could not create PDF: {}", _0.display())]
    Pdf(#[error(not(source))] PathBuf),
    #[display("could not walk directory: {}", _0.display())]
    Walk(#[error(not(source))] PathBuf),
    #[display("could not write archive: {}", _0.display())]
    Archive(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
