//! Run configuration shared by both tools.
//!
//! Built once at startup from CLI flags (which clap may fill from the
//! environment or a `.env` file) and passed by reference afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::paths;
use crate::error::{Result, SysrootError};

/// Directories kept by the pruner when no `--keep` is given.
pub const DEFAULT_KEEP_DIRS: &[&str] = &["/lib", "/usr/lib", "/usr/include"];

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct SysrootConfig {
    /// Absolute, lexically cleaned root of the sysroot tree.
    pub sysroot: PathBuf,
    /// When true, report intended actions without touching the tree.
    pub preview: bool,
}

impl SysrootConfig {
    /// Validate and normalize the sysroot.
    ///
    /// The sysroot must be non-empty and name an existing directory. Relative
    /// paths are made absolute against the current directory; symlinks in the
    /// sysroot path itself are left alone.
    pub fn new(sysroot: impl AsRef<Path>, preview: bool) -> Result<Self> {
        let sysroot = sysroot.as_ref();
        if sysroot.as_os_str().is_empty() {
            return Err(SysrootError::config("sysroot must not be empty"));
        }

        let absolute = std::path::absolute(sysroot).map_err(|e| {
            SysrootError::config(format!("cannot resolve sysroot {:?}: {}", sysroot, e))
        })?;
        let sysroot = paths::clean(&absolute);

        match fs::metadata(&sysroot) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(SysrootError::config(format!(
                    "sysroot {:?} is not a directory",
                    sysroot
                )))
            }
            Err(e) => {
                return Err(SysrootError::config(format!(
                    "sysroot {:?} is not accessible: {}",
                    sysroot, e
                )))
            }
        }

        Ok(Self { sysroot, preview })
    }

    /// Log the configuration.
    pub fn log(&self) {
        tracing::debug!(sysroot = %self.sysroot.display(), preview = self.preview, "configuration");
        if self.preview {
            tracing::info!("preview mode: no changes will be made (use --preview=false to apply)");
        }
    }
}
