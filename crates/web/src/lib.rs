//! A small web form in front of the download pipeline.
//!
//! `GET /` shows the form; `POST /download-manga` runs a download on a
//! blocking worker and answers with what happened once it is finished.

pub mod error;
mod form;
mod pages;
mod server;

pub use crate::form::DownloadForm;
pub use crate::pages::Pages;
pub use crate::server::{AppState, routes, serve};
