mod cli;
mod error;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use clap::{CommandFactory, Parser};
use exn::ResultExt;
use mpdl_config::Config;
use mpdl_library::{Pipeline, Request, RunReport};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.command.is_none() && cli.manga_url.is_none() {
        Cli::command().print_help().or_raise(|| ErrorKind::Output)?;
        return Ok(ExitCode::SUCCESS);
    }
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    cli.apply(&mut config);
    if let Some(Command::Serve { bind }) = &cli.command {
        mpdl_web::serve(config, bind).or_raise(|| ErrorKind::Server)?;
        return Ok(ExitCode::SUCCESS);
    }
    let request = Request {
        manga_url: cli.manga_url.clone().unwrap_or_default(),
        selector: cli.selector().or_raise(|| ErrorKind::Arguments)?,
        height: config.image.height,
    };
    tracing::info!(url = %request.manga_url, selector = %request.selector, "Starting download");
    let pipeline = Pipeline::from_config(&config).or_raise(|| ErrorKind::Download)?;
    let report = pipeline.run(&request).or_raise(|| ErrorKind::Download)?;
    summarize(&report);
    Ok(if report.is_clean() { ExitCode::SUCCESS } else { ExitCode::from(2) })
}

fn summarize(report: &RunReport) {
    for chapter in &report.completed {
        println!("chapter {}: {} ({} pages)", chapter.chapter, chapter.pdf.display(), chapter.pages);
    }
    for failure in &report.failed {
        println!("chapter {}: FAILED: {}", failure.chapter, failure.reason);
    }
    if let Some(archive) = &report.archive {
        println!("{} PDF(s) archived in {}", report.archived, archive.display());
    }
}
