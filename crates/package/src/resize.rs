use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use image::ImageReader;
use image::imageops::FilterType;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Scales an image to `height` pixels, keeping its aspect ratio.
///
/// With no height the input path is returned as-is and nothing is written.
/// Otherwise the result goes next to the input as `<path>.res`, in the input's
/// own format.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn resize(path: &Path, height: Option<u32>) -> Result<PathBuf> {
    let Some(height) = height else {
        return Ok(path.to_path_buf());
    };
    if height == 0 {
        exn::bail!(ErrorKind::InvalidHeight);
    }
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let format = reader.format().ok_or_raise(|| ErrorKind::Decode(path.to_path_buf()))?;
    let image = reader.decode().or_raise(|| ErrorKind::Decode(path.to_path_buf()))?;
    let width = scaled_width(image.width(), image.height(), height);
    let output = resized_path(path);
    image
        .resize_exact(width, height, FilterType::Lanczos3)
        .save_with_format(&output, format)
        .or_raise(|| ErrorKind::Encode(output.clone()))?;
    tracing::debug!(from = ?(image.width(), image.height()), to = ?(width, height), "Image resized");
    Ok(output)
}

fn scaled_width(width: u32, height: u32, target: u32) -> u32 {
    let scaled = f64::from(width) * f64::from(target) / f64::from(height.max(1));
    (scaled.round() as u32).max(1)
}

fn resized_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".res");
    PathBuf::from(name)
}
