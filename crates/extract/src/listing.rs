//! Chapter listing extraction from a manga's index page.

use crate::consts;
use crate::markers::Markers;
use crate::models::{ChapterNumber, ChapterRef};
use scraper::Html;
use std::collections::HashMap;
use tracing::instrument;
use url::Url;

/// Chapters found on an index page.
#[derive(Debug, Default)]
pub struct Listing {
    /// One entry per chapter number, in document order.
    pub chapters: Vec<ChapterRef>,
    /// Labels that looked like chapter links but carried no usable number.
    pub skipped: Vec<String>,
}

/// Extracts the chapter number from a link label.
///
/// Returns `None` when the label is not a chapter label at all, and
/// `Some(None)` when it is one but the number can't be parsed.
///
/// ```rust
/// use mpdl_extract::parse_chapter_label;
///
/// assert_eq!(parse_chapter_label("Chapter 12: The Return").unwrap().unwrap().to_string(), "12");
/// assert_eq!(parse_chapter_label("Ch.7").unwrap().unwrap().to_string(), "7");
/// assert!(parse_chapter_label("Chapter ???").unwrap().is_none());
/// assert!(parse_chapter_label("Comments").is_none());
/// ```
pub fn parse_chapter_label(label: &str) -> Option<Option<ChapterNumber>> {
    let captures = consts::CHAPTER_LABEL_REGEX.captures(label.trim())?;
    Some(captures.name("number").and_then(|m| m.as_str().parse().ok()))
}

/// Extracts every chapter link from an index page.
///
/// Each chapter container contributes its first chapter link, resolved
/// against `page_url`. Duplicate chapter numbers are resolved last-wins: the later
/// link (in document order) replaces the earlier one.
#[instrument(skip(html, markers), fields(html_size = html.len(), chapters, skipped))]
pub fn chapters(html: &str, page_url: &Url, markers: &Markers) -> Listing {
    let document = Html::parse_document(html);
    let mut listing = Listing::default();
    let mut seen: HashMap<ChapterNumber, usize> = HashMap::new();
    for container in document.select(&markers.chapter_container) {
        let Some(anchor) = container.select(&markers.chapter_link).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let label = anchor.text().collect::<String>().trim().to_string();
        let number = match parse_chapter_label(&label) {
            None => continue,
            Some(Some(number)) => number,
            Some(None) => {
                tracing::warn!(label = %label, "Skipping invalid chapter number");
                listing.skipped.push(label);
                continue;
            },
        };
        let url = match page_url.join(href.trim()) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(label = %label, href = href, error = %e, "Skipping chapter with invalid link");
                listing.skipped.push(label);
                continue;
            },
        };
        let chapter = ChapterRef::new(number, url);
        match seen.get(&number).copied() {
            Some(index) => {
                tracing::warn!(chapter = %number, url = %chapter.url, "Duplicate chapter number; keeping the later link");
                listing.chapters[index] = chapter;
            },
            None => {
                seen.insert(number, listing.chapters.len());
                listing.chapters.push(chapter);
            },
        }
    }
    let span = tracing::Span::current();
    span.record("chapters", listing.chapters.len());
    span.record("skipped", listing.skipped.len());
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn page_url() -> Url {
        Url::parse("https://example-manga.site/manga/demo-title/").unwrap()
    }

    fn entry(href: &str, label: &str) -> String {
        format!(r#"<div class="space-x-1 flex"><a class="link-hover link-primary" href="{href}">{label}</a></div>"#)
    }

    fn page(entries: &[String]) -> String {
        format!("<html><body><main>{}</main></body></html>", entries.concat())
    }

    #[rstest]
    #[case("Ch.12", Some(Some(12.0)))]
    #[case("Ch. 12", Some(Some(12.0)))]
    #[case("Ch.12.5", Some(Some(12.5)))]
    #[case("Chapter 7", Some(Some(7.0)))]
    #[case("Chapter 7: The Storm", Some(Some(7.0)))]
    #[case("Chapter 7 : The Storm", Some(Some(7.0)))]
    #[case("  Chapter 8  ", Some(Some(8.0)))]
    #[case("Chapter 9:", Some(Some(9.0)))]
    #[case("Chapter abc", Some(None))]
    #[case("Ch.", Some(None))]
    #[case("Chapter 3 extra", Some(None))]
    #[case("Vol.1 Ch.3", None)]
    #[case("Comments", None)]
    #[case("chapter 4", None)]
    fn parses_labels(#[case] label: &str, #[case] expected: Option<Option<f64>>) {
        let parsed = parse_chapter_label(label).map(|n| n.map(|n| n.value()));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn extracts_valid_and_counts_malformed() {
        let html = page(&[
            entry("/manga/demo-title/v1/c1", "Ch.1"),
            entry("/manga/demo-title/v1/c2", "Chapter 2: Beginnings"),
            entry("/manga/demo-title/v1/cx", "Chapter ???"),
            entry("/manga/demo-title/v1/c3", "Chapter 3"),
            entry("/manga/demo-title/v1/cy", "Ch.three"),
            entry("/manga/demo-title/comments", "Comments"),
        ]);
        let listing = chapters(&html, &page_url(), &Markers::default());
        let numbers: Vec<String> = listing.chapters.iter().map(|c| c.number.to_string()).collect();
        assert_eq!(numbers, ["1", "2", "3"]);
        assert_eq!(listing.skipped, ["Chapter ???", "Ch.three"]);
    }

    #[test]
    fn resolves_links_against_page() {
        let html = page(&[entry("/manga/demo-title/v1/c5", "Chapter 5"), entry("c6", "Chapter 6")]);
        let listing = chapters(&html, &page_url(), &Markers::default());
        assert_eq!(listing.chapters[0].url.as_str(), "https://example-manga.site/manga/demo-title/v1/c5");
        assert_eq!(listing.chapters[1].url.as_str(), "https://example-manga.site/manga/demo-title/c6");
    }

    #[test]
    fn ignores_links_outside_the_marker() {
        let html = r#"
            <div class="space-x-1"><a class="link-hover" href="/c1">Chapter 1</a></div>
            <div class="other"><a class="link-hover" href="/c2">Chapter 2</a></div>
            <div class="space-x-1"><a class="plain" href="/c3">Chapter 3</a></div>
            <div class="space-x-1"><a class="link-hover">Chapter 4</a></div>
        "#;
        let listing = chapters(html, &page_url(), &Markers::default());
        assert_eq!(listing.chapters.len(), 1);
        assert_eq!(listing.chapters[0].number, ChapterNumber::from(1));
    }

    #[test]
    fn only_the_first_link_of_a_container_counts() {
        let html = r#"
            <div class="space-x-1">
                <a class="link-hover" href="/manga/demo-title/v1/c5">Chapter 5</a>
                <a class="link-hover" href="/manga/demo-title/v2/c5">Ch.5</a>
                <a class="link-hover" href="/manga/demo-title/v1/c6">Chapter 6</a>
            </div>
        "#;
        let listing = chapters(html, &page_url(), &Markers::default());
        assert_eq!(listing.chapters.len(), 1);
        assert_eq!(listing.chapters[0].url.path(), "/manga/demo-title/v1/c5");
    }

    #[test]
    fn duplicate_numbers_keep_the_last_link() {
        let html = page(&[
            entry("/manga/demo-title/v1/c5", "Chapter 5"),
            entry("/manga/demo-title/v2/c5", "Ch.5"),
        ]);
        let listing = chapters(&html, &page_url(), &Markers::default());
        assert_eq!(listing.chapters.len(), 1);
        assert_eq!(listing.chapters[0].url.path(), "/manga/demo-title/v2/c5");
    }

    #[test]
    fn custom_markers_are_honoured() {
        let html = r#"<ul class="chapters"><li><a href="/c9">Chapter 9</a></li></ul>"#;
        let markers = Markers::new("ul.chapters li", "a", "img").unwrap();
        let listing = chapters(html, &page_url(), &markers);
        assert_eq!(listing.chapters.len(), 1);
    }

    #[test]
    fn empty_page_has_no_chapters() {
        let listing = chapters("<html></html>", &page_url(), &Markers::default());
        assert!(listing.chapters.is_empty());
        assert!(listing.skipped.is_empty());
    }
}
