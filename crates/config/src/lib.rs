//! Layered configuration for mpdl.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`]),
//! 2. `config.{toml,yaml,json}` in the user's configuration directory,
//! 3. an explicitly requested file (format chosen by extension),
//! 4. `MPDL_`-prefixed environment variables, nested keys separated by `__`
//!    (`MPDL_IMAGE__HEIGHT=1600`, `MPDL_SITE__BASE_URL=https://…`).
//!
//! Command-line flags are applied on top by the binary.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use mpdl_extract::{
    DEFAULT_BASE_URL, DEFAULT_CHAPTER_CONTAINER, DEFAULT_CHAPTER_LINK, DEFAULT_PAGE_IMAGE, DEFAULT_PATH_PREFIX, Url,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

pub const ENV_PREFIX: &str = "MPDL_";
/// Sent with every request; the site rejects default client identifiers.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub image: ImageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Relative and scheme-less URLs are resolved against this.
    pub base_url: String,
    /// Path segment preceding the manga title in chapter URLs.
    pub path_prefix: String,
    pub user_agent: String,
    pub markers: MarkerConfig,
}
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            markers: MarkerConfig::default(),
        }
    }
}

/// The site's markup contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// CSS selector for each chapter entry on the index page.
    pub chapter_container: String,
    /// CSS selector for the link inside a chapter entry.
    pub chapter_link: String,
    /// CSS selector for page images on a rendered chapter page.
    pub page_image: String,
    /// Exact visible text of the element dismissing the overlay.
    pub overlay_text: String,
}
impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            chapter_container: DEFAULT_CHAPTER_CONTAINER.to_string(),
            chapter_link: DEFAULT_CHAPTER_LINK.to_string(),
            page_image: DEFAULT_PAGE_IMAGE.to_string(),
            overlay_text: "Close".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Chrome/Chromium binary; discovered on `PATH` when unset.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    /// How long to wait for the overlay to become clickable.
    pub render_timeout_secs: u64,
    /// Pause after dismissing the overlay, letting the page settle.
    pub settle_millis: u64,
    pub window_width: u32,
    pub window_height: u32,
}
impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            render_timeout_secs: 10,
            settle_millis: 1000,
            window_width: 1920,
            window_height: 1080,
        }
    }
}
impl BrowserConfig {
    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout; requests may block indefinitely when unset.
    pub timeout_secs: Option<u64>,
}
impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root of the per-chapter working directories.
    pub downloads: PathBuf,
    /// Where chapter PDFs and the final archive are written.
    pub finals: PathBuf,
    /// Archive file name, inside `finals`.
    pub archive: String,
    /// Template for a chapter's working directory, relative to `downloads`.
    pub chapter_dir: String,
    /// Template for a chapter's PDF file name, relative to `finals`.
    pub chapter_pdf: String,
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            downloads: PathBuf::from("downloads"),
            finals: PathBuf::from("finals"),
            archive: "final_pdfs.zip".to_string(),
            chapter_dir: "{{ title }}/chapter_{{ chapter }}".to_string(),
            chapter_pdf: "chapter_{{ chapter }}.pdf".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Target height in pixels; images are left untouched when unset.
    pub height: Option<u32>,
}

impl Config {
    /// The user's configuration directory, if the platform has one.
    pub fn user_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mpdl").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Assembles every configuration source, in override order.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(dir) = Self::user_dir() {
            figment = figment
                .merge(Toml::file(dir.join("config.toml")))
                .merge(Yaml::file(dir.join("config.yaml")))
                .merge(Json::file(dir.join("config.json")));
        }
        if let Some(path) = explicit {
            figment = Self::merge_file(figment, path);
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn merge_file(figment: Figment, path: &Path) -> Figment {
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => figment.merge(Toml::file(path)),
        }
    }

    /// Loads and validates the configuration from every source.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit
            && !path.is_file()
        {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        Self::from_figment(&Self::figment(explicit))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match Url::parse(&self.site.base_url) {
            Ok(url) if url.has_host() => {},
            _ => exn::bail!(ErrorKind::Invalid {
                field: "site.base_url",
                reason: format!("`{}` is not an absolute URL", self.site.base_url),
            }),
        }
        if self.image.height == Some(0) {
            exn::bail!(ErrorKind::Invalid { field: "image.height", reason: "must be at least 1".to_string() });
        }
        for (field, template) in [("output.chapter_dir", &self.output.chapter_dir), ("output.chapter_pdf", &self.output.chapter_pdf)] {
            if template.trim().is_empty() {
                exn::bail!(ErrorKind::Invalid { field, reason: "template is empty".to_string() });
            }
        }
        if self.output.archive.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid { field: "output.archive", reason: "file name is empty".to_string() });
        }
        Ok(())
    }
}
