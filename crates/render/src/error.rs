//! Render Error Types

use derive_more::{Display, Error};

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("chrome/chromium not detected on your system")]
    ChromeNotFound,
    /// The browser process could not be started.
    #[display("could not launch the browser")]
    Launch,
    #[display("could not load page: {_0}")]
    Navigation(#[error(not(source))] String),
    /// An element was found but could not be interacted with.
    #[display("could not interact with page: {_0}")]
    Interaction(#[error(not(source))] String),
    #[display("could not read rendered markup of: {_0}")]
    Content(#[error(not(source))] String),
    /// Raw message from the browser driver, whose errors are not `std` errors.
    #[display("browser driver: {_0}")]
    Driver(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Navigation(_))
    }

    /// Returns `true` when no page can be rendered at all, as opposed to a
    /// single page failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ChromeNotFound | Self::Launch)
    }
}

pub(crate) fn driver(error: impl std::fmt::Display) -> Error {
    Error::from(ErrorKind::Driver(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::ChromeNotFound, true)]
    #[case(ErrorKind::Launch, true)]
    #[case(ErrorKind::Navigation("https://example.com".into()), false)]
    #[case(ErrorKind::Content("https://example.com".into()), false)]
    fn unavailability(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_unavailable(), expected);
    }

    #[test]
    fn driver_message_is_kept() {
        let err = driver("connection closed");
        assert!(matches!(&*err, ErrorKind::Driver(message) if message == "connection closed"));
    }
}
