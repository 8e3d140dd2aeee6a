use mpdl_extract::Url;
use mpdl_extract::models::ChapterNumber;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Where a run currently is. Every change is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    ListingChapters,
    SelectingChapters,
    ProcessingChapter(ChapterNumber),
    Archiving,
    Done,
    Failed,
}
impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ListingChapters => write!(f, "listing-chapters"),
            Self::SelectingChapters => write!(f, "selecting-chapters"),
            Self::ProcessingChapter(number) => write!(f, "processing-chapter({number})"),
            Self::Archiving => write!(f, "archiving"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A chapter that made it into a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterOutcome {
    pub chapter: ChapterNumber,
    pub pdf: PathBuf,
    pub pages: usize,
}

/// A chapter that was abandoned; the run carried on without it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterFailure {
    pub chapter: ChapterNumber,
    pub url: Url,
    pub reason: String,
}

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Chapters found on the index page.
    pub listed: usize,
    /// Chapter labels on the index page that could not be used.
    pub skipped: Vec<String>,
    pub completed: Vec<ChapterOutcome>,
    pub failed: Vec<ChapterFailure>,
    pub archive: Option<PathBuf>,
    /// PDFs in the archive, including ones from earlier runs.
    pub archived: usize,
}
impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
