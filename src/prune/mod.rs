//! Sysroot pruning: delete everything outside the keep-set.
//!
//! The walk is top-down. In apply mode a rejected entry is removed together
//! with its subtree and never descended into; a kept directory is descended
//! and its children are judged one by one. Preview mode reports the decision
//! for every entry (descending into every directory) and changes nothing.

pub mod keep;

use std::io::Write;

use walkdir::WalkDir;

use crate::common::FsOps;
use crate::config::SysrootConfig;
use crate::error::SysrootError;

pub use keep::KeepSet;

/// Counts from one pruning run.
///
/// In preview mode `removed` counts every entry reported as `Deleting`,
/// including entries below a rejected directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Entries kept.
    pub kept: usize,
    /// Entries (subtree roots) actually removed; failed removals count as errors.
    pub removed: usize,
    /// Listing or removal failures reported.
    pub errors: usize,
}

/// Prune `config.sysroot` against `keep`.
///
/// Decision lines go to `out`, failures to `err`. Failures never abort the
/// walk: an unreadable directory is skipped, a failed removal is left behind.
pub fn prune(
    config: &SysrootConfig,
    keep: &KeepSet,
    fs: &dyn FsOps,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> std::io::Result<PruneSummary> {
    let mut summary = PruneSummary::default();
    let root = &config.sysroot;

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(next) = walker.next() {
        let entry = match next {
            Ok(entry) => entry,
            Err(e) => {
                let e = SysrootError::walk(root, e);
                tracing::debug!(error = %e, "skipping unreadable subtree");
                writeln!(err, "{}", e)?;
                summary.errors += 1;
                continue;
            }
        };

        let pathname = entry.path();
        let is_dir = entry.file_type().is_dir();
        let keeping = keep.keeps(pathname);
        tracing::debug!(path = %pathname.display(), keeping, is_dir, "prune decision");

        if keeping {
            summary.kept += 1;
        }

        if config.preview {
            if !keeping {
                summary.removed += 1;
            }
            let verb = if keeping { "Keeping" } else { "Deleting" };
            if is_dir {
                writeln!(out, "{}: {:?}/...", verb, pathname)?;
            } else {
                writeln!(out, "{}: {:?}", verb, pathname)?;
            }
            continue;
        }

        if !keeping {
            match fs.remove_all(pathname) {
                Ok(()) => summary.removed += 1,
                Err(source) => {
                    let e = SysrootError::Remove {
                        path: pathname.to_path_buf(),
                        source,
                    };
                    writeln!(err, "{}", e)?;
                    summary.errors += 1;
                }
            }
            if is_dir {
                walker.skip_current_dir();
            }
        }
    }

    Ok(summary)
}
