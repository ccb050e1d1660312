//! Shared utilities for the sysroot tools.

pub mod fs;
pub mod paths;

pub use fs::{FsOps, HostFs};
pub use paths::{clean, is_within, join_under};
