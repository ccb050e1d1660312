//! The pruner's keep-set and keep predicate.

use std::path::{Path, PathBuf};

use crate::common::paths;
use crate::config::DEFAULT_KEEP_DIRS;

/// Ordered set of directory prefixes that must survive pruning.
///
/// Every prefix is rooted under the sysroot: `/usr/lib` and `usr/lib` both
/// become `<sysroot>/usr/lib`, and `..` can never climb out of the sysroot.
#[derive(Debug, Clone)]
pub struct KeepSet {
    sysroot: PathBuf,
    prefixes: Vec<PathBuf>,
}

impl KeepSet {
    /// Build a keep-set from operator-supplied directories.
    ///
    /// Empty items are ignored. If nothing is left, [`DEFAULT_KEEP_DIRS`] is
    /// used. Duplicates are dropped, first occurrence wins.
    pub fn new<S: AsRef<str>>(sysroot: &Path, dirs: &[S]) -> Self {
        let mut requested: Vec<&str> = dirs
            .iter()
            .map(|d| d.as_ref().trim())
            .filter(|d| !d.is_empty())
            .collect();
        if requested.is_empty() {
            requested = DEFAULT_KEEP_DIRS.to_vec();
        }

        let mut prefixes: Vec<PathBuf> = Vec::with_capacity(requested.len());
        for dir in requested {
            let prefix = paths::join_under(sysroot, Path::new(dir));
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }

        Self {
            sysroot: sysroot.to_path_buf(),
            prefixes,
        }
    }

    /// Keep-set made of [`DEFAULT_KEEP_DIRS`].
    pub fn defaults(sysroot: &Path) -> Self {
        Self::new::<&str>(sysroot, &[])
    }

    /// Normalized prefixes, in the order they were given.
    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// Decide whether `path` survives pruning.
    ///
    /// Anything outside the sysroot is never kept. Inside it, a path is kept
    /// when it is at or below a keep prefix, or when it is an ancestor of one
    /// (otherwise the only route to a kept directory would be deleted).
    pub fn keeps(&self, path: &Path) -> bool {
        let path = paths::clean(path);
        if !path.starts_with(&self.sysroot) {
            return false;
        }
        self.prefixes
            .iter()
            .any(|k| path.starts_with(k) || k.starts_with(&path))
    }
}
