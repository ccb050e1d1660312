//! Maintenance tools for staged sysroot trees.
//!
//! - [`prune`] deletes everything outside a keep-set of directories
//! - [`rewrite`] re-roots absolute symlinks that point outside the tree
//!
//! Both are exposed as libraries for testing and driven by the
//! `clean-sysroot` and `rewrite-links` binaries.

pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod prune;
pub mod rewrite;

pub use config::{SysrootConfig, DEFAULT_KEEP_DIRS};
pub use error::{Result, SysrootError};
