use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use mpdl_library::{ChapterSelector, Request};
use serde::Deserialize;

/// The download form as submitted. Every field arrives as text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadForm {
    #[serde(rename = "mangapark-url", default)]
    pub manga_url: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub chapters: String,
}
impl DownloadForm {
    /// Validates the form. Blank height and chapters mean "don't resize" and
    /// "no chapters".
    pub fn into_request(self) -> Result<Request> {
        let manga_url = self.manga_url.trim().to_string();
        if manga_url.is_empty() {
            exn::bail!(ErrorKind::InvalidForm("a manga URL is required".to_string()));
        }
        let height = match self.height.trim() {
            "" => None,
            raw => match raw.parse::<u32>() {
                Ok(height) if height > 0 => Some(height),
                _ => exn::bail!(ErrorKind::InvalidForm(format!("height must be a positive number, not `{raw}`"))),
            },
        };
        let selector = self
            .chapters
            .parse::<ChapterSelector>()
            .or_raise(|| ErrorKind::InvalidForm(format!("unrecognised chapter selection `{}`", self.chapters.trim())))?;
        Ok(Request { manga_url, selector, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form(url: &str, height: &str, chapters: &str) -> DownloadForm {
        DownloadForm { manga_url: url.into(), height: height.into(), chapters: chapters.into() }
    }

    #[test]
    fn accepts_a_complete_form() {
        let request = form(" https://mangapark.me/manga/demo/ ", "1600", "5").into_request().unwrap();
        assert_eq!(request.manga_url, "https://mangapark.me/manga/demo/");
        assert_eq!(request.height, Some(1600));
        assert_eq!(request.selector, "5".parse().unwrap());
    }

    #[test]
    fn blank_fields_are_optional() {
        let request = form("/manga/demo/", "", "").into_request().unwrap();
        assert_eq!(request.height, None);
        assert_eq!(request.selector, ChapterSelector::None);
    }

    #[rstest]
    #[case("", "", "5")]
    #[case("  ", "", "5")]
    #[case("/manga/demo/", "0", "5")]
    #[case("/manga/demo/", "-3", "5")]
    #[case("/manga/demo/", "tall", "5")]
    #[case("/manga/demo/", "", "five")]
    #[case("/manga/demo/", "", "9-2")]
    fn rejects_invalid_input(#[case] url: &str, #[case] height: &str, #[case] chapters: &str) {
        let err = form(url, height, chapters).into_request().unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidForm(_)));
    }
}
