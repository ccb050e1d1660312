//! clean-sysroot - prune a sysroot tree down to the directories worth keeping.
//!
//! Runs in preview mode unless `--preview=false` is given.

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use sysroot_util::cli;
use sysroot_util::common::HostFs;
use sysroot_util::prune::{self, KeepSet};
use sysroot_util::{SysrootConfig, DEFAULT_KEEP_DIRS};

#[derive(Parser)]
#[command(name = "clean-sysroot")]
#[command(about = "Clean unneeded directories out of a sysroot directory tree")]
#[command(after_help = format!(
    "The --keep argument takes a comma-separated list of directories to keep and may be \
     repeated. Default list of directories to keep: {}.\n\n\
     By default clean-sysroot operates in preview mode and shows the action it would take \
     without removing anything; use --preview=false to delete files.",
    DEFAULT_KEEP_DIRS.join(", ")
))]
struct Cli {
    /// Root of the sysroot directory tree
    #[arg(long, env = "SYSROOT")]
    sysroot: Option<PathBuf>,

    /// Only report what would be deleted (set to false to actually delete files)
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

    /// Directories to keep, comma separated (repeatable)
    #[arg(long, env = "SYSROOT_KEEP", value_delimiter = ',')]
    keep: Vec<String>,
}

fn main() -> Result<()> {
    cli::load_dotenv();
    cli::init_tracing();

    let args = Cli::parse();
    let sysroot = cli::require_sysroot(
        args.sysroot,
        "please supply a sysroot arg.",
        Cli::command().render_usage(),
    );

    let config = SysrootConfig::new(&sysroot, args.preview).context("Bad --sysroot")?;
    config.log();

    let keep = KeepSet::new(&config.sysroot, args.keep.as_slice());
    tracing::debug!(prefixes = ?keep.prefixes(), "keep-set");

    let started = Instant::now();
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let summary = prune::prune(&config, &keep, &HostFs, &mut out, &mut err)
        .context("Failed to write report")?;

    tracing::info!(
        kept = summary.kept,
        removed = summary.removed,
        errors = summary.errors,
        preview = config.preview,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "clean-sysroot finished"
    );
    Ok(())
}
