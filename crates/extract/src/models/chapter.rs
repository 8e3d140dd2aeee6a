use super::ChapterNumber;
use url::Url;

/// A chapter link found on a manga's index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    pub number: ChapterNumber,
    /// Absolute URL of the chapter page.
    pub url: Url,
}
impl ChapterRef {
    pub fn new(number: impl Into<ChapterNumber>, url: Url) -> Self {
        Self { number: number.into(), url }
    }
}
