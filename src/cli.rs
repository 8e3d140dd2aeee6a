use clap::{ArgAction, Parser, Subcommand};
use mpdl_config::Config;
use mpdl_extract::models::ChapterNumber;
use mpdl_library::{ChapterRange, ChapterSelector};
use std::path::PathBuf;

/// Download manga chapters as PDFs.
///
/// Without a chapter selection only the chapter list is fetched; the archive of
/// previously downloaded PDFs is still rebuilt.
#[derive(Debug, Parser)]
#[command(name = "mpdl", version, about)]
pub struct Cli {
    /// The manga's page, e.g. https://mangapark.me/manga/ajin-miura-tsuina/
    #[arg(short = 'm', long = "manga-url", value_name = "URL")]
    pub manga_url: Option<String>,
    /// Scale every page to this height in pixels.
    #[arg(short = 's', long = "size", visible_alias = "height", value_name = "PIXELS",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,
    /// Download a single chapter.
    #[arg(short = 'c', long, value_name = "N", value_parser = parse_chapter, conflicts_with = "chapters")]
    pub chapter: Option<ChapterNumber>,
    /// Download every chapter from FIRST to LAST, inclusive.
    #[arg(long, num_args = 2, value_names = ["FIRST", "LAST"], value_parser = parse_chapter)]
    pub chapters: Option<Vec<ChapterNumber>>,
    /// Configuration file (TOML, YAML or JSON, by extension).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
    /// More logging; repeat for more detail. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve a web form for starting downloads.
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: String,
    },
}

fn parse_chapter(s: &str) -> Result<ChapterNumber, String> {
    s.parse().map_err(|_| format!("`{s}` is not a chapter number"))
}

impl Cli {
    /// The chapters the flags ask for. Fails on a reversed range.
    pub fn selector(&self) -> mpdl_library::error::Result<ChapterSelector> {
        if let Some(chapter) = self.chapter {
            return Ok(ChapterSelector::Single(chapter));
        }
        match self.chapters.as_deref() {
            Some([first, last]) => Ok(ChapterSelector::Range(ChapterRange::new(*first, *last)?)),
            _ => Ok(ChapterSelector::None),
        }
    }

    /// Flags take precedence over every configuration source.
    pub fn apply(&self, config: &mut Config) {
        if let Some(height) = self.height {
            config.image.height = Some(height);
        }
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_directive(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}
