//! Turns a manga's index page into chapter PDFs and a zip of all of them.

pub mod error;
mod lister;
mod pipeline;
mod report;
mod selector;
mod template;

pub use crate::lister::list_chapters;
pub use crate::pipeline::{Pipeline, Request};
pub use crate::report::{ChapterFailure, ChapterOutcome, RunReport, Stage};
pub use crate::selector::{ChapterRange, ChapterSelector};
pub use crate::template::{ChapterVars, Layout, PathGenerator};
