use image::{ImageFormat, Rgb, RgbImage};
use mpdl_config::Config;
use mpdl_extract::models::ChapterNumber;
use mpdl_fetch::MockFetcher;
use mpdl_library::error::ErrorKind;
use mpdl_library::{ChapterRange, ChapterSelector, Pipeline, Request};
use mpdl_render::{ChromeOptions, HeadlessChrome, StaticBrowser};
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

const SITE: &str = "https://example-manga.site/";
const INDEX: &str = "https://example-manga.site/manga/demo-title/";
const IMAGES: &str = "https://img.example-manga.site/demo-title";

fn chapter_url(n: u32) -> String {
    format!("{SITE}manga/demo-title/v1/c{n}")
}

fn jpeg() -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::from_pixel(40, 60, Rgb([30, 60, 90])).write_to(&mut bytes, ImageFormat::Jpeg).unwrap();
    bytes.into_inner()
}

fn index_page(chapters: &[u32]) -> String {
    chapters
        .iter()
        .map(|n| format!(r#"<div class="space-x-1"><a class="link-hover" href="/manga/demo-title/v1/c{n}">Chapter {n}</a></div>"#))
        .collect()
}

fn chapter_page(n: u32, pages: usize) -> String {
    let images: String = (1..=pages)
        .map(|p| format!(r#"<img class="w-full h-full" src="{IMAGES}/c{n}/{p:03}.jpg?token=abc">"#))
        .collect();
    format!("<html><body><div><span>Close</span></div>{images}</body></html>")
}

/// Index with chapters 5, 6 and 7, each with two pages.
fn site() -> (MockFetcher, StaticBrowser) {
    let mut fetch = MockFetcher::new().with(INDEX, index_page(&[5, 6, 7]));
    let mut browser = StaticBrowser::new();
    for n in [5, 6, 7] {
        browser = browser.with_page(&chapter_url(n), chapter_page(n, 2));
        for p in 1..=2 {
            fetch = fetch.with(format!("{IMAGES}/c{n}/{p:03}.jpg"), jpeg());
        }
    }
    (fetch, browser)
}

fn config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.base_url = SITE.to_string();
    config.browser.settle_millis = 0;
    config.output.downloads = dir.path().join("downloads");
    config.output.finals = dir.path().join("finals");
    config
}

fn request(selector: ChapterSelector) -> Request {
    Request { manga_url: INDEX.to_string(), selector, height: None }
}

fn archive_entries(path: &Path) -> Vec<String> {
    let mut zip = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..zip.len()).map(|i| zip.by_index(i).unwrap().name().to_string()).collect()
}

fn completed(report: &mpdl_library::RunReport) -> Vec<String> {
    report.completed.iter().map(|c| c.chapter.to_string()).collect()
}

#[test]
fn single_chapter_is_packaged_and_archived() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let pipeline = Pipeline::new(fetch, browser, &config(&dir)).unwrap();

    let report = pipeline.run(&request(ChapterSelector::Single(ChapterNumber::from(5)))).unwrap();

    assert_eq!(report.listed, 3);
    assert_eq!(completed(&report), ["5"]);
    assert!(report.is_clean());
    let pdf = dir.path().join("finals/chapter_5.pdf");
    assert_eq!(report.completed[0].pdf, pdf);
    assert_eq!(report.completed[0].pages, 2);
    assert!(pdf.is_file());
    assert!(dir.path().join("downloads/demo-title/chapter_5/001.jpg").is_file());
    assert!(!dir.path().join("finals/chapter_6.pdf").exists());

    let archive = report.archive.unwrap();
    assert_eq!(archive, dir.path().join("finals/final_pdfs.zip"));
    assert_eq!(archive_entries(&archive), ["chapter_5.pdf"]);

    assert_eq!(pipeline.browser().launches(), 1);
    assert_eq!(pipeline.browser().visited(), [chapter_url(5)]);
    assert_eq!(pipeline.browser().open_sessions(), 0);
}

#[test]
fn range_is_processed_highest_first() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let pipeline = Pipeline::new(fetch, browser, &config(&dir)).unwrap();
    let range = ChapterSelector::Range(ChapterRange::new(5u32, 6u32).unwrap());

    let report = pipeline.run(&request(range)).unwrap();

    assert_eq!(completed(&report), ["6", "5"]);
    assert_eq!(pipeline.browser().visited(), [chapter_url(6), chapter_url(5)]);
    assert_eq!(archive_entries(&report.archive.unwrap()), ["chapter_5.pdf", "chapter_6.pdf"]);
}

#[test]
fn failed_chapter_does_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    // Chapter 6 points at an image nobody serves.
    let browser = browser.with_page(&chapter_url(6), chapter_page(6, 3));
    let pipeline = Pipeline::new(fetch, browser, &config(&dir)).unwrap();
    let range = ChapterSelector::Range(ChapterRange::new(5u32, 7u32).unwrap());

    let report = pipeline.run(&request(range)).unwrap();

    assert_eq!(completed(&report), ["7", "5"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].chapter, ChapterNumber::from(6));
    assert_eq!(report.failed[0].url.as_str(), chapter_url(6));
    assert_eq!(archive_entries(&report.archive.unwrap()), ["chapter_5.pdf", "chapter_7.pdf"]);
}

#[test]
fn chapter_without_images_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let browser = browser.with_page(&chapter_url(7), "<html><body><p>Moved</p></body></html>");
    let pipeline = Pipeline::new(fetch, browser, &config(&dir)).unwrap();

    let report = pipeline.run(&request(ChapterSelector::Single(ChapterNumber::from(7)))).unwrap();

    assert!(report.completed.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert!(!dir.path().join("finals/chapter_7.pdf").exists());
    assert_eq!(report.archived, 0);
}

#[test]
fn missing_chapter_processes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let pipeline = Pipeline::new(fetch, browser, &config(&dir)).unwrap();

    let report = pipeline.run(&request(ChapterSelector::Single(ChapterNumber::from(9)))).unwrap();

    assert!(report.completed.is_empty() && report.failed.is_empty());
    assert_eq!(pipeline.browser().launches(), 0);
}

#[test]
fn no_selection_goes_straight_to_archiving() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let pipeline = Pipeline::new(fetch, browser, &config(&dir)).unwrap();

    let report = pipeline.run(&request(ChapterSelector::None)).unwrap();

    assert_eq!(report.listed, 3);
    assert_eq!(pipeline.browser().launches(), 0);
    assert_eq!(report.archived, 0);
    assert!(report.archive.unwrap().is_file());
}

#[test]
fn images_are_resized_when_a_height_is_given() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let pipeline = Pipeline::new(fetch, browser, &config(&dir)).unwrap();
    let request = Request { height: Some(30), ..request(ChapterSelector::Single(ChapterNumber::from(5))) };

    let report = pipeline.run(&request).unwrap();

    assert_eq!(report.completed[0].pages, 2);
    let resized = dir.path().join("downloads/demo-title/chapter_5/001.jpg.res");
    let image = image::ImageReader::open(&resized).unwrap().with_guessed_format().unwrap().decode().unwrap();
    assert_eq!((image.width(), image.height()), (20, 30));
}

#[test]
fn unavailable_browser_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, _) = site();
    let pipeline = Pipeline::new(fetch, StaticBrowser::unavailable(), &config(&dir)).unwrap();
    let range = ChapterSelector::Range(ChapterRange::new(5u32, 7u32).unwrap());

    let err = pipeline.run(&request(range)).unwrap_err();

    assert!(matches!(*err, ErrorKind::BrowserUnavailable));
    assert!(!dir.path().join("finals/final_pdfs.zip").exists());
}

#[test]
fn stuck_overlay_does_not_fail_the_chapter() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let pipeline = Pipeline::new(fetch, browser.with_broken_clicks(), &config(&dir)).unwrap();

    let report = pipeline.run(&request(ChapterSelector::Single(ChapterNumber::from(5)))).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.completed[0].pages, 2);
}

fn missing_chrome(dir: &TempDir) -> HeadlessChrome {
    HeadlessChrome::new(ChromeOptions { executable: Some(dir.path().join("no-chrome")), ..ChromeOptions::default() })
}

#[test]
fn no_selection_runs_without_chrome() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, _) = site();
    let pipeline = Pipeline::new(fetch, missing_chrome(&dir), &config(&dir)).unwrap();

    let report = pipeline.run(&request(ChapterSelector::None)).unwrap();

    assert_eq!(report.listed, 3);
    assert!(report.completed.is_empty());
    assert!(report.archive.unwrap().is_file());
}

#[test]
fn missing_chrome_aborts_once_a_chapter_is_selected() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, _) = site();
    let pipeline = Pipeline::new(fetch, missing_chrome(&dir), &config(&dir)).unwrap();

    let err = pipeline.run(&request(ChapterSelector::Single(ChapterNumber::from(5)))).unwrap_err();

    assert!(matches!(*err, ErrorKind::BrowserUnavailable));
}

#[test]
fn pipeline_can_be_built_without_chrome() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir);
    config.browser.executable = Some(dir.path().join("no-chrome"));
    assert!(Pipeline::from_config(&config).is_ok());
}

#[test]
fn malformed_chapter_url_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let index = r#"<div class="space-x-1"><a class="link-hover" href="/manga/demo-title/c4">Chapter 4</a></div>"#;
    let fetch = MockFetcher::new().with(INDEX, index);
    let pipeline = Pipeline::new(fetch, StaticBrowser::new(), &config(&dir)).unwrap();

    let err = pipeline.run(&request(ChapterSelector::Single(ChapterNumber::from(4)))).unwrap_err();

    assert!(matches!(*err, ErrorKind::Parse(_)));
    assert_eq!(pipeline.browser().launches(), 0);
}

#[test]
fn unreachable_index_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(MockFetcher::new(), StaticBrowser::new(), &config(&dir)).unwrap();

    let err = pipeline.run(&request(ChapterSelector::None)).unwrap_err();

    assert!(matches!(*err, ErrorKind::Listing(_)));
}

#[test]
fn relative_manga_url_is_resolved_against_the_site() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let pipeline = Pipeline::new(fetch, browser, &config(&dir)).unwrap();
    let request = Request { manga_url: "/manga/demo-title/".to_string(), ..request(ChapterSelector::None) };

    assert_eq!(pipeline.run(&request).unwrap().listed, 3);
}

#[test]
fn output_follows_configured_templates() {
    let dir = tempfile::tempdir().unwrap();
    let (fetch, browser) = site();
    let mut config = config(&dir);
    config.output.chapter_pdf = "{{ title }}/{{ segment }}.pdf".to_string();
    let pipeline = Pipeline::new(fetch, browser, &config).unwrap();

    let report = pipeline.run(&request(ChapterSelector::Single(ChapterNumber::from(5)))).unwrap();

    let expected: PathBuf = dir.path().join("finals/demo-title/c5.pdf");
    assert_eq!(report.completed[0].pdf, expected);
    assert_eq!(archive_entries(&report.archive.unwrap()), ["demo-title/c5.pdf"]);
}
