//! rewrite-links - rewrite absolute symlinks in a sysroot tree so they point
//! into the tree instead of at the host.
//!
//! Runs in preview mode unless `--preview=false` is given.

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use std::sync::Arc;

use sysroot_util::cli;
use sysroot_util::common::HostFs;
use sysroot_util::rewrite;
use sysroot_util::SysrootConfig;

#[derive(Parser)]
#[command(name = "rewrite-links")]
#[command(
    about = "Rewrite absolute symlinks within a sysroot directory tree to be relative to the root of that tree"
)]
#[command(
    after_help = "By default rewrite-links operates in preview mode and only prints the links it \
                  would rewrite; use --preview=false to rewrite them."
)]
struct Cli {
    /// Sysroot directory
    #[arg(long, env = "SYSROOT")]
    sysroot: Option<PathBuf>,

    /// Only report what would be rewritten (set to false to actually rewrite links)
    #[arg(
        long,
        env = "SYSROOT_PREVIEW",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    preview: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    cli::load_dotenv();
    cli::init_tracing();

    let args = Cli::parse();
    let sysroot = cli::require_sysroot(
        args.sysroot,
        "please supply a sysroot arg",
        Cli::command().render_usage(),
    );

    let config = SysrootConfig::new(&sysroot, args.preview).context("Bad --sysroot")?;
    config.log();

    let started = Instant::now();
    let mut out = io::stdout();
    let mut err = io::stderr();
    let summary = rewrite::run_rewrite(&config, Arc::new(HostFs), &mut out, &mut err)
        .await
        .context("Failed to rewrite links")?;

    tracing::info!(
        found = summary.found,
        rewritten = summary.rewritten,
        errors = summary.errors,
        preview = config.preview,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rewrite-links finished"
    );
    Ok(())
}
