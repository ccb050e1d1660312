//! Producer side of the rewriter: find absolute symlinks that escape the tree.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::common::{paths, FsOps};
use crate::error::SysrootError;

/// An absolute, out-of-tree symlink waiting to be rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLinkRewrite {
    /// Location of the symlink.
    pub source: PathBuf,
    /// Literal target text as stored in the link.
    pub target: PathBuf,
}

/// Returns true if a link with this literal target needs rewriting.
///
/// Relative targets already resolve inside the tree, and absolute targets
/// under the sysroot are already correct.
pub fn needs_rewrite(target: &Path, sysroot: &Path) -> bool {
    target.is_absolute() && !paths::is_within(target, sysroot)
}

/// Walk `sysroot` depth-first and send every link that needs rewriting.
///
/// Blocking: run it on a blocking task. Errors are sent individually and the
/// walk continues. Returns early if the consumer has hung up on either
/// channel. The caller closes the queues by dropping the senders afterwards.
pub fn find_absolute_links(
    sysroot: &Path,
    fs: &dyn FsOps,
    work: &mpsc::Sender<PendingLinkRewrite>,
    errors: &mpsc::Sender<SysrootError>,
) {
    let walker = WalkDir::new(sysroot)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for next in walker {
        let entry = match next {
            Ok(entry) => entry,
            Err(e) => {
                if errors.blocking_send(SysrootError::walk(sysroot, e)).is_err() {
                    return;
                }
                continue;
            }
        };

        if !entry.file_type().is_symlink() {
            continue;
        }

        let source = entry.into_path();
        let target = match fs.read_link(&source) {
            Ok(target) => target,
            // Replaced or removed by the consumer since it was listed
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(link = %source.display(), "link vanished during scan");
                continue;
            }
            Err(e) => {
                let e = SysrootError::ReadLink {
                    path: source,
                    source: e,
                };
                if errors.blocking_send(e).is_err() {
                    return;
                }
                continue;
            }
        };

        if !needs_rewrite(&target, sysroot) {
            tracing::debug!(link = %source.display(), target = %target.display(), "link left alone");
            continue;
        }

        tracing::debug!(link = %source.display(), target = %target.display(), "absolute link found");
        if work.blocking_send(PendingLinkRewrite { source, target }).is_err() {
            return;
        }
    }
}
