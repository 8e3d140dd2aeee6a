//! Application Error Types

use derive_more::{Display, Error};

/// An application error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for the application.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("invalid arguments")]
    Arguments,
    #[display("download failed")]
    Download,
    #[display("web server failed")]
    Server,
    #[display("could not write to terminal")]
    Output,
}
