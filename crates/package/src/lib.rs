//! Turns downloaded page images into chapter PDFs, and chapter PDFs into a
//! single zip archive.

mod archive;
pub mod error;
mod pdf;
mod resize;

pub use crate::archive::build_archive;
pub use crate::pdf::package;
pub use crate::resize::resize;
