//! Page image extraction from a rendered chapter page.

use crate::markers::Markers;
use scraper::Html;
use tracing::instrument;
use url::Url;

/// Extracts the chapter's page images, in document order.
///
/// Relative sources are resolved against `page_url`; query strings and
/// fragments are stripped. Images without a usable `src` are skipped. A page
/// without any matching image yields an empty list rather than an error.
#[instrument(skip(html, markers), fields(html_size = html.len(), images))]
pub fn image_urls(html: &str, page_url: &Url, markers: &Markers) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut urls = Vec::new();
    for image in document.select(&markers.page_image) {
        let Some(src) = image.value().attr("src").map(str::trim).filter(|s| !s.is_empty()) else {
            tracing::debug!("Skipping page image without source");
            continue;
        };
        match page_url.join(src) {
            Ok(url) => urls.push(strip_parameters(url)),
            Err(e) => tracing::warn!(src = src, error = %e, "Skipping page image with invalid source"),
        }
    }
    tracing::Span::current().record("images", urls.len());
    urls
}

/// Drops the query string and fragment of a URL.
pub fn strip_parameters(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example-manga.site/manga/demo-title/v1/c5").unwrap()
    }

    #[test]
    fn extracts_images_in_document_order() {
        let html = r#"
            <div class="reader">
                <div><img class="w-full h-full" src="https://img.example/c5/001.jpg?acc=abc&exp=1"></div>
                <img class="logo" src="https://img.example/logo.png">
                <div><div><img class="w-full h-full" src="https://img.example/c5/002.jpg#frag"></div></div>
                <img class="h-full w-full object-cover" src="/static/c5/003.png">
            </div>
        "#;
        let urls = image_urls(html, &page_url(), &Markers::default());
        let urls: Vec<&str> = urls.iter().map(Url::as_str).collect();
        assert_eq!(
            urls,
            [
                "https://img.example/c5/001.jpg",
                "https://img.example/c5/002.jpg",
                "https://example-manga.site/static/c5/003.png",
            ]
        );
    }

    #[test]
    fn skips_images_without_source() {
        let html = r#"<img class="w-full h-full"><img class="w-full h-full" src="  "><img class="w-full h-full" src="a.jpg">"#;
        let urls = image_urls(html, &page_url(), &Markers::default());
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].as_str(), "https://example-manga.site/manga/demo-title/v1/a.jpg");
    }

    #[test]
    fn missing_markers_yield_no_images() {
        let html = r#"<html><body><p>Nothing to see here</p><img src="x.jpg"></body></html>"#;
        assert!(image_urls(html, &page_url(), &Markers::default()).is_empty());
    }

    #[test]
    fn strips_query_and_fragment() {
        let url = Url::parse("https://img.example/a/b.webp?x=1&y=2#z").unwrap();
        assert_eq!(strip_parameters(url).as_str(), "https://img.example/a/b.webp");
    }
}
