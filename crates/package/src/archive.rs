use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

/// Zips every PDF below `root` into `archive`, replacing any existing file.
///
/// Entry names are the paths relative to `root`, `/`-separated and sorted.
/// A missing `root` yields an empty archive. Returns the number of entries.
#[instrument(fields(root = %root.display(), archive = %archive.display(), entries))]
pub fn build_archive(root: &Path, archive: &Path) -> Result<usize> {
    let entries = collect_pdfs(root)?;
    if let Some(parent) = archive.parent() {
        fs::create_dir_all(parent).or_raise(|| ErrorKind::Write(parent.to_path_buf()))?;
    }
    let file = File::create(archive).or_raise(|| ErrorKind::Write(archive.to_path_buf()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, path) in &entries {
        zip.start_file(name.as_str(), options).or_raise(|| ErrorKind::Archive(archive.to_path_buf()))?;
        let mut source = File::open(path).or_raise(|| ErrorKind::Read(path.clone()))?;
        io::copy(&mut source, &mut zip).or_raise(|| ErrorKind::Archive(archive.to_path_buf()))?;
        tracing::trace!(entry = %name, "Added to archive");
    }
    zip.finish().or_raise(|| ErrorKind::Archive(archive.to_path_buf()))?;
    tracing::Span::current().record("entries", entries.len());
    tracing::info!(entries = entries.len(), "Archive written");
    Ok(entries.len())
}

fn collect_pdfs(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !root.exists() {
        tracing::warn!(root = %root.display(), "Nothing to archive; directory does not exist");
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.or_raise(|| ErrorKind::Walk(root.to_path_buf()))?;
        if !entry.file_type().is_file() || !is_pdf(entry.path()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name: Vec<String> = relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
        entries.push((name.join("/"), entry.into_path()));
    }
    entries.sort();
    Ok(entries)
}

fn is_pdf(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
