use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// Site the chapter URLs are resolved against when they arrive without a host.
pub const DEFAULT_BASE_URL: &str = "https://mangapark.me/";
/// Leading path segment that precedes the manga title in chapter URLs.
pub const DEFAULT_PATH_PREFIX: &str = "manga";
/// Element wrapping each chapter entry on an index page.
pub const DEFAULT_CHAPTER_CONTAINER: &str = "div.space-x-1";
/// The chapter link inside an entry; only the first match counts.
pub const DEFAULT_CHAPTER_LINK: &str = "a.link-hover";
/// Class marker of the page images on a rendered chapter page.
pub const DEFAULT_PAGE_IMAGE: &str = "img.w-full.h-full";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

selector!(CHAPTER_CONTAINER_SELECTOR, DEFAULT_CHAPTER_CONTAINER);
selector!(CHAPTER_LINK_SELECTOR, DEFAULT_CHAPTER_LINK);
selector!(PAGE_IMAGE_SELECTOR, DEFAULT_PAGE_IMAGE);
// "Ch.12", "Ch. 12.5", "Chapter 12", "Chapter 12: The Return"
regex!(CHAPTER_LABEL_REGEX, r"(?s)^(?:Ch\.|Chapter)\s*(?P<number>[^:]*?)\s*(?::.*)?$");
regex!(CHAPTER_NUMBER_REGEX, r"^\d+(?:\.\d+)?$");
