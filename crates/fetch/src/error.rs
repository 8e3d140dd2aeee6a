//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed (TLS backend, bad header).
    #[display("could not build HTTP client")]
    Client,
    /// The request to the given URL failed before a response arrived, or
    /// the body could not be read.
    #[display("request failed: {_0}")]
    Network(#[error(not(source))] String),
    /// The server answered with a non-success status.
    #[display("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    /// The URL has no final path segment to name the downloaded file after.
    #[display("no file name in URL: {_0}")]
    NoFileName(#[error(not(source))] String),
    /// Writing the downloaded file failed.
    #[display("could not write {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
