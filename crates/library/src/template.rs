//! Output paths from [upon] templates.
//!
//! Chapter working directories and PDF names are rendered from user
//! configured templates (`{{ variable }}`, `{{ value|formatter }}`), with one
//! extra formatter:
//!
//! - **`slug`**: converts strings to URL-safe slugs, stripping quotation marks
//!   first to avoid artifacts like leading/trailing hyphens.
//!
//! # Template Variables
//!
//! | Variable  | Description                                       |
//! |-----------|---------------------------------------------------|
//! | `title`   | Title segment of the chapter URL                  |
//! | `version` | Version segment of the chapter URL                |
//! | `chapter` | Chapter number, without a trailing `.0`           |
//! | `segment` | Chapter segment of the chapter URL (e.g. `c20`)   |
//!
//! # Example
//!
//! ```
//! use mpdl_library::{ChapterVars, PathGenerator};
//! use mpdl_extract::models::{ChapterNumber, MangaIdentity};
//!
//! let identity = MangaIdentity { title: "demo-title".into(), version: "v1".into(), chapter: "c5".into() };
//! let vars = ChapterVars::new(&identity, ChapterNumber::from(5));
//! let generator: PathGenerator = "{{ title }}/chapter_{{ chapter }}".parse().unwrap();
//! assert_eq!(generator.generate(&vars).unwrap().to_str(), Some("demo-title/chapter_5"));
//! ```

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use mpdl_config::OutputConfig;
use mpdl_extract::models::{ChapterNumber, MangaIdentity};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::instrument;
use upon::{Engine, Template};

/// The values a path template can refer to.
#[derive(Debug, Clone)]
pub struct ChapterVars {
    pub title: String,
    pub version: String,
    pub chapter: String,
    pub segment: String,
}
impl ChapterVars {
    pub fn new(identity: &MangaIdentity, number: ChapterNumber) -> Self {
        Self {
            title: identity.title.clone(),
            version: identity.version.clone(),
            chapter: number.to_string(),
            segment: identity.chapter.clone(),
        }
    }

    fn parameters(&self) -> upon::Value {
        upon::value! {
            title: &self.title,
            version: &self.version,
            chapter: &self.chapter,
            segment: &self.segment,
        }
    }
}

/// Generates relative paths from [`ChapterVars`] and a template string.
///
/// Constructed via [`FromStr`], which compiles the template eagerly so that
/// syntax errors surface at creation time rather than at render time.
///
/// Generated paths are normalized (trimmed, deduplicated separators) and
/// checked so they never leave the directory they are joined onto.
pub struct PathGenerator {
    engine: Engine<'static>,
    template: Template<'static>,
}
impl FromStr for PathGenerator {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template })
    }
}
impl PathGenerator {
    #[instrument(skip_all, fields(title = %vars.title, chapter = %vars.chapter))]
    pub fn generate(&self, vars: &ChapterVars) -> Result<PathBuf> {
        let path = self
            .template
            .render(&self.engine, vars.parameters())
            .to_string()
            .or_raise(|| ErrorKind::Template)?;
        normalize(&path)
    }
}

/// Trims each segment and drops empty and `.` segments, rejecting anything
/// that would climb out of the base directory.
fn normalize(path: &str) -> Result<PathBuf> {
    let joined = path.trim().split('/').map(str::trim).collect::<Vec<_>>().join("/");
    let mut components = Vec::new();
    for component in Path::new(&joined).components() {
        match component {
            Component::Normal(s) => {
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::Template);
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::Template),
            Component::ParentDir => {
                if components.pop().is_none() {
                    tracing::error!(path = %joined, "Generated path escapes its base directory");
                    exn::bail!(ErrorKind::Template);
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::Template),
        false => Ok(components.into_iter().collect()),
    }
}

/// Where everything a run produces ends up on disk.
pub struct Layout {
    downloads: PathBuf,
    finals: PathBuf,
    archive: PathBuf,
    chapter_dir: PathGenerator,
    chapter_pdf: PathGenerator,
}
impl Layout {
    pub fn new(output: &OutputConfig) -> Result<Self> {
        Ok(Self {
            downloads: output.downloads.clone(),
            finals: output.finals.clone(),
            archive: normalize(&output.archive)?,
            chapter_dir: output.chapter_dir.parse()?,
            chapter_pdf: output.chapter_pdf.parse()?,
        })
    }

    /// Working directory for a chapter's images.
    pub fn chapter_dir(&self, vars: &ChapterVars) -> Result<PathBuf> {
        Ok(self.downloads.join(self.chapter_dir.generate(vars)?))
    }

    pub fn chapter_pdf(&self, vars: &ChapterVars) -> Result<PathBuf> {
        Ok(self.finals.join(self.chapter_pdf.generate(vars)?))
    }

    pub fn finals(&self) -> &Path {
        &self.finals
    }

    pub fn archive_path(&self) -> PathBuf {
        self.finals.join(&self.archive)
    }
}

/// Custom [`upon`] extensions for path-safe string manipulation.
mod addons {
    use rslug::slugify;
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    fn slug_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => {
                // Various quotation marks: '"''""„"`«»
                let marks = [
                    '\u{0027}', '\u{0022}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{201E}', '\u{201B}',
                    '\u{0060}', '\u{00AB}', '\u{00BB}', '\u{2039}', '\u{203A}',
                ];
                let stripped: String = s.chars().filter(|c| !marks.contains(c)).collect();
                write!(f, "{}", slugify!(&stripped))?
            },
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("slug", slug_formatter);
    }
}
