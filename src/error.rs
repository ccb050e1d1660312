//! Error types for the sysroot tools.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or walking a sysroot.
///
/// Walk and mutation errors are reported per entry and never abort a run;
/// only [`SysrootError::Config`] is fatal.
#[derive(Debug, Error)]
pub enum SysrootError {
    /// The configuration is unusable (missing or invalid sysroot).
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// A directory could not be opened or listed.
    #[error("failed to open {path:?}: {source}")]
    Walk {
        /// Directory (or entry) the walker failed on.
        path: PathBuf,
        /// Underlying I/O error (or a loop report from the walker).
        source: std::io::Error,
    },

    /// A symlink's target could not be read.
    #[error("failed to read link {path:?}: {source}")]
    ReadLink {
        /// The symlink.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An entry could not be removed.
    #[error("failed to remove {path:?}: {source}")]
    Remove {
        /// The entry being removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl SysrootError {
    /// Build a [`SysrootError::Config`] from anything printable.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap a walker error, recovering the path it failed on.
    pub fn walk(root: &std::path::Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| root.to_path_buf());
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other(message));
        Self::Walk { path, source }
    }
}

/// Result alias for the library.
pub type Result<T> = std::result::Result<T, SysrootError>;
