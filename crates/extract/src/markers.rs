use crate::consts;
use crate::error::{ErrorKind, Result};
use scraper::Selector;

/// The structural markers (CSS selectors) the scraper relies on.
///
/// These are the site's markup contract. They live here, compiled once, so a
/// change on the site only means a configuration change.
#[derive(Debug, Clone)]
pub struct Markers {
    pub(crate) chapter_container: Selector,
    pub(crate) chapter_link: Selector,
    pub(crate) page_image: Selector,
}
impl Default for Markers {
    fn default() -> Self {
        Self {
            chapter_container: consts::CHAPTER_CONTAINER_SELECTOR.clone(),
            chapter_link: consts::CHAPTER_LINK_SELECTOR.clone(),
            page_image: consts::PAGE_IMAGE_SELECTOR.clone(),
        }
    }
}
impl Markers {
    pub fn new(chapter_container: &str, chapter_link: &str, page_image: &str) -> Result<Self> {
        Ok(Self {
            chapter_container: Self::compile(chapter_container)?,
            chapter_link: Self::compile(chapter_link)?,
            page_image: Self::compile(page_image)?,
        })
    }

    fn compile(css: &str) -> Result<Selector> {
        // SelectorErrorKind borrows the input, so it can't be kept as a source.
        Selector::parse(css).map_err(|e| {
            tracing::debug!(selector = css, error = %e, "Rejected CSS selector");
            exn::Exn::from(ErrorKind::InvalidSelector(css.to_string()))
        })
    }
}
