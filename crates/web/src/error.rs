//! Web Error Types

use derive_more::{Display, Error};

/// A web error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for web operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// Asset was not loadable.
    #[display("missing embedded asset: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    #[display("could not render page: {_0}")]
    Template(#[error(not(source))] String),
    /// The submitted form can't be turned into a download.
    #[display("{_0}")]
    InvalidForm(#[error(not(source))] String),
    #[display("could not listen on: {_0}")]
    Bind(#[error(not(source))] String),
    #[display("web server stopped unexpectedly")]
    Server,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Bind(_))
    }
}
