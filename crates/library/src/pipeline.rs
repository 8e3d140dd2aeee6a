//! The end-to-end download run.
//!
//! A run lists a manga's chapters, selects some, turns each into a PDF and
//! finally zips every PDF in the output directory. Failures of a single
//! chapter (network, rendering, conversion) are logged and recorded in the
//! [`RunReport`]; the run moves on to the next chapter. Errors that would
//! fail every chapter alike abort the run (see [`ErrorKind::aborts_run`]).

use crate::error::{ErrorKind, Result};
use crate::lister::list_chapters;
use crate::report::{ChapterFailure, ChapterOutcome, RunReport, Stage};
use crate::selector::ChapterSelector;
use crate::template::{ChapterVars, Layout};
use exn::ResultExt;
use mpdl_config::Config;
use mpdl_extract::models::ChapterRef;
use mpdl_extract::{Markers, Url, UrlParser};
use mpdl_fetch::{Fetch, HttpClient, ImageAsset, download_image};
use mpdl_render::{Browser, ChromeOptions, HeadlessChrome, Overlay, PageScraper};
use tracing::instrument;

/// What to download.
#[derive(Debug, Clone)]
pub struct Request {
    /// The manga's index page; may be relative to the site or lack a scheme.
    pub manga_url: String,
    pub selector: ChapterSelector,
    /// Page height to scale images to, if any.
    pub height: Option<u32>,
}

pub struct Pipeline<F, B> {
    fetch: F,
    scraper: PageScraper<B>,
    parser: UrlParser,
    markers: Markers,
    layout: Layout,
}

impl Pipeline<HttpClient, HeadlessChrome> {
    /// A pipeline talking to the real site through HTTP and headless Chrome.
    ///
    /// Chrome is only looked for once a chapter needs rendering.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetch = HttpClient::new(&config.site.user_agent, config.http.timeout()).or_raise(|| ErrorKind::Config)?;
        let options = ChromeOptions {
            executable: config.browser.executable.clone(),
            headless: config.browser.headless,
            window_size: (config.browser.window_width, config.browser.window_height),
        };
        Self::new(fetch, HeadlessChrome::new(options), config)
    }
}

impl<F: Fetch, B: Browser> Pipeline<F, B> {
    pub fn new(fetch: F, browser: B, config: &Config) -> Result<Self> {
        let markers = &config.site.markers;
        let markers = Markers::new(&markers.chapter_container, &markers.chapter_link, &markers.page_image)
            .or_raise(|| ErrorKind::Config)?;
        let base = Url::parse(&config.site.base_url).or_raise(|| ErrorKind::Config)?;
        let overlay = Overlay {
            text: config.site.markers.overlay_text.clone(),
            timeout: config.browser.render_timeout(),
            settle: config.browser.settle_delay(),
        };
        Ok(Self {
            fetch,
            scraper: PageScraper::new(browser, markers.clone(), overlay),
            parser: UrlParser::new(base, config.site.path_prefix.as_str()),
            markers,
            layout: Layout::new(&config.output)?,
        })
    }

    pub fn browser(&self) -> &B {
        self.scraper.browser()
    }

    /// Runs the whole download and returns what happened.
    #[instrument(skip(self, request), fields(url = %request.manga_url, selector = %request.selector))]
    pub fn run(&self, request: &Request) -> Result<RunReport> {
        let mut run = Run::default();
        match self.drive(request, &mut run) {
            Ok(()) => {
                run.enter(Stage::Done);
                tracing::info!(
                    completed = run.report.completed.len(),
                    failed = run.report.failed.len(),
                    "Run finished"
                );
                Ok(run.report)
            },
            Err(e) => {
                let stage = run.stage;
                run.enter(Stage::Failed);
                tracing::error!(stage = %stage, error = ?e, "Run aborted");
                Err(e)
            },
        }
    }

    fn drive(&self, request: &Request, run: &mut Run) -> Result<()> {
        run.enter(Stage::ListingChapters);
        let index = self.parser.resolve(&request.manga_url).or_raise(|| ErrorKind::Parse(request.manga_url.clone()))?;
        let listing = list_chapters(&self.fetch, &index, &self.markers)?;
        run.report.listed = listing.chapters.len();
        run.report.skipped = listing.skipped;

        run.enter(Stage::SelectingChapters);
        let selected = request.selector.select(listing.chapters);
        if selected.is_empty() && request.selector != ChapterSelector::None {
            tracing::warn!(selector = %request.selector, "No listed chapter matches the selection");
        }

        for chapter in selected {
            run.enter(Stage::ProcessingChapter(chapter.number));
            match self.process_chapter(&chapter, request.height) {
                Ok(outcome) => run.report.completed.push(outcome),
                Err(e) if e.aborts_run() => return Err(e),
                Err(e) => {
                    tracing::error!(chapter = %chapter.number, url = %chapter.url, error = ?e, "Chapter failed");
                    run.report.failed.push(ChapterFailure {
                        chapter: chapter.number,
                        url: chapter.url.clone(),
                        reason: (*e).to_string(),
                    });
                },
            }
        }

        run.enter(Stage::Archiving);
        let archive = self.layout.archive_path();
        run.report.archived =
            mpdl_package::build_archive(self.layout.finals(), &archive).or_raise(|| ErrorKind::Archive(archive.clone()))?;
        run.report.archive = Some(archive);
        Ok(())
    }

    /// Renders, downloads, resizes and packages one chapter.
    #[instrument(skip(self, chapter), fields(chapter = %chapter.number, url = %chapter.url))]
    fn process_chapter(&self, chapter: &ChapterRef, height: Option<u32>) -> Result<ChapterOutcome> {
        let parsed = self.parser.parse(chapter.url.as_str()).or_raise(|| ErrorKind::Parse(chapter.url.to_string()))?;
        let vars = ChapterVars::new(&parsed.identity, chapter.number);
        let dir = self.layout.chapter_dir(&vars)?;
        let pdf = self.layout.chapter_pdf(&vars)?;

        let images = match self.scraper.image_urls(&parsed.url) {
            Ok(images) => images,
            Err(e) if e.is_unavailable() => return Err(e).or_raise(|| ErrorKind::BrowserUnavailable),
            Err(e) => return Err(e).or_raise(|| ErrorKind::Scrape(parsed.url.to_string())),
        };
        tracing::info!(images = images.len(), dir = %dir.display(), "Downloading chapter");

        let mut pages: Vec<ImageAsset> = Vec::with_capacity(images.len());
        for url in &images {
            let asset = download_image(&self.fetch, url, &dir).or_raise(|| ErrorKind::Download(url.to_string()))?;
            let path = mpdl_package::resize(&asset.path, height).or_raise(|| ErrorKind::Resize(asset.path.clone()))?;
            pages.push(asset.with_path(path));
        }

        let pages = mpdl_package::package(&pages, &pdf).or_raise(|| ErrorKind::Package(pdf.clone()))?;
        Ok(ChapterOutcome { chapter: chapter.number, pdf, pages })
    }
}

#[derive(Default)]
struct Run {
    stage: Stage,
    report: RunReport,
}
impl Run {
    fn enter(&mut self, stage: Stage) {
        tracing::debug!(from = %self.stage, to = %stage, "Stage changed");
        self.stage = stage;
    }
}
