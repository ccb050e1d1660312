//! Symlink rewriting: point absolute links back into the sysroot.
//!
//! A link such as `<sysroot>/bin/x -> /usr/local/y` resolves against the host
//! root once the tree is used as a sysroot. The rewriter turns it into
//! `<sysroot>/bin/x -> <sysroot>/usr/local/y`.
//!
//! The tree is scanned on a blocking task that feeds a bounded work queue
//! (backpressure at [`WORK_QUEUE_CAPACITY`] pending links) and a separate error
//! queue. The consumer loop applies rewrites until the work queue closes.

pub mod scan;

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::common::{paths, FsOps};
use crate::config::SysrootConfig;

pub use scan::{find_absolute_links, needs_rewrite, PendingLinkRewrite};

/// Pending rewrites buffered before the scanner blocks.
pub const WORK_QUEUE_CAPACITY: usize = 100;

/// Scan errors buffered before the scanner blocks.
pub const ERROR_QUEUE_CAPACITY: usize = 1;

/// Suffix of the temporary link created while replacing a link.
const TMP_SUFFIX: &str = ".rewrite-tmp";

// Unique temporary names within a process.
static NEXT_TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Counts from one rewrite run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Absolute out-of-tree links discovered.
    pub found: usize,
    /// Links rewritten (in preview mode: links that would be rewritten).
    pub rewritten: usize,
    /// Scan errors plus failed rewrites.
    pub errors: usize,
}

/// Rewrite one link to point at its target re-rooted under the sysroot.
///
/// Returns `Ok(false)` if the link could not be replaced; the failure has
/// already been written to `err` and the old link is untouched. The outer
/// `io::Result` only fails when writing to `out`/`err` fails.
pub fn rewrite(
    link: &PendingLinkRewrite,
    config: &SysrootConfig,
    fs: &dyn FsOps,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<bool> {
    let new_target = paths::join_under(&config.sysroot, &link.target);

    if config.preview {
        writeln!(
            out,
            "rewrite: {} -> {:?} to {:?}",
            link.source.display(),
            link.target,
            new_target
        )?;
        return Ok(true);
    }

    if let Err(e) = replace_link(fs, &link.source, &new_target) {
        writeln!(err, "{:?} -> {:?}: {}", link.source, new_target, e)?;
        return Ok(false);
    }

    tracing::debug!(
        link = %link.source.display(),
        from = %link.target.display(),
        to = %new_target.display(),
        "rewrote link"
    );
    Ok(true)
}

/// Point the symlink at `link` to `target` without a window where it is missing.
///
/// The new link is created under a temporary name in the same directory and
/// renamed over the old one, so any failure leaves the old link in place.
fn replace_link(fs: &dyn FsOps, link: &Path, target: &Path) -> io::Result<()> {
    let parent = link.parent().unwrap_or_else(|| Path::new("."));
    let name = link
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "link".to_string());
    let counter = NEXT_TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp = parent.join(format!(".{}.{}.{}{}", name, std::process::id(), counter, TMP_SUFFIX));

    fs.symlink(target, &tmp)?;
    if let Err(e) = fs.rename(&tmp, link) {
        let _ = fs.remove(&tmp);
        return Err(e);
    }
    Ok(())
}

/// Scan the sysroot and rewrite every absolute out-of-tree link.
///
/// Scan errors are written to `err` as `Error: <message>` and never stop the
/// run. Returns once the scanner has finished and every queued link and
/// error has been handled.
pub async fn run_rewrite<F>(
    config: &SysrootConfig,
    fs: Arc<F>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<RewriteSummary>
where
    F: FsOps + 'static,
{
    let (work_tx, mut work_rx) = mpsc::channel::<PendingLinkRewrite>(WORK_QUEUE_CAPACITY);
    let (error_tx, mut error_rx) = mpsc::channel(ERROR_QUEUE_CAPACITY);

    let sysroot = config.sysroot.clone();
    let scan_fs = Arc::clone(&fs);
    let scanner = tokio::task::spawn_blocking(move || {
        find_absolute_links(&sysroot, scan_fs.as_ref(), &work_tx, &error_tx);
        // work_tx and error_tx drop here, closing both queues
    });

    let mut summary = RewriteSummary::default();
    let mut errors_open = true;

    loop {
        tokio::select! {
            biased;

            next = error_rx.recv(), if errors_open => match next {
                Some(e) => {
                    writeln!(err, "Error: {}", e)?;
                    summary.errors += 1;
                }
                None => errors_open = false,
            },

            next = work_rx.recv() => match next {
                Some(link) => {
                    // Rewrites run inline: the consumer is the only async task,
                    // and each one is a symlink plus a rename.
                    summary.found += 1;
                    if rewrite(&link, config, fs.as_ref(), out, err)? {
                        summary.rewritten += 1;
                    } else {
                        summary.errors += 1;
                    }
                }
                None => break,
            },
        }
    }

    // The scanner may have queued a final error just before closing
    if errors_open {
        while let Some(e) = error_rx.recv().await {
            writeln!(err, "Error: {}", e)?;
            summary.errors += 1;
        }
    }

    scanner.await.map_err(io::Error::other)?;
    Ok(summary)
}
