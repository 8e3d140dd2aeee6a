use crate::client::Fetch;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use mpdl_extract::Url;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A downloaded page image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Where the image came from, without query parameters.
    pub source: Url,
    /// The file currently representing the image (the download, or a resized
    /// derivative of it).
    pub path: PathBuf,
}
impl ImageAsset {
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..self }
    }
}
impl AsRef<Path> for ImageAsset {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// The file name an image URL is stored under: its final path segment.
pub fn file_name(url: &Url) -> Result<&str> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .ok_or_raise(|| ErrorKind::NoFileName(url.to_string()))
}

/// Downloads one image into `dir`, named after the URL's final path segment.
///
/// Creates `dir` when missing and overwrites an existing file of the same name.
#[instrument(skip(fetch, dir), fields(url = %url, dir = %dir.display()))]
pub fn download_image(fetch: &impl Fetch, url: &Url, dir: &Path) -> Result<ImageAsset> {
    let path = dir.join(file_name(url)?);
    let body = fetch.bytes(url)?;
    fs::create_dir_all(dir).or_raise(|| ErrorKind::Write(dir.to_path_buf()))?;
    fs::write(&path, &body).or_raise(|| ErrorKind::Write(path.clone()))?;
    tracing::debug!(path = %path.display(), size = body.len(), "Image saved");
    Ok(ImageAsset { source: url.clone(), path })
}
