//! Shared test utilities for the sysroot tool tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use sysroot_util::SysrootConfig;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Test environment with a temporary sysroot.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Sysroot under test
    pub sysroot: PathBuf,
    /// Directory next to the sysroot, outside of it
    pub outside: PathBuf,
}

impl TestEnv {
    /// Create a new test environment with an empty sysroot.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let sysroot = temp_dir.path().join("sysroot");
        let outside = temp_dir.path().join("outside");

        fs::create_dir_all(&sysroot).expect("Failed to create sysroot dir");
        fs::create_dir_all(&outside).expect("Failed to create outside dir");

        Self {
            _temp_dir: temp_dir,
            sysroot,
            outside,
        }
    }

    /// Build the run configuration for this sysroot.
    pub fn config(&self, preview: bool) -> SysrootConfig {
        SysrootConfig::new(&self.sysroot, preview).expect("sysroot should be valid")
    }

    /// Absolute path of `rel` inside the sysroot.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.sysroot.join(rel)
    }

    /// Create a directory (and parents) inside the sysroot.
    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.path(rel)).expect("Failed to create dir");
    }

    /// Create a file (and parents) inside the sysroot.
    pub fn touch(&self, rel: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, rel).expect("Failed to write file");
    }

    /// Create a symlink at `rel` inside the sysroot with a literal target.
    pub fn symlink(&self, rel: &str, target: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::os::unix::fs::symlink(target, &path).expect("Failed to create symlink");
    }

    /// Create a directory chain at `rel` whose deepest directory has a path
    /// longer than PATH_MAX, so listing it fails (ENAMETOOLONG) even as root.
    ///
    /// The chain is built outside the sysroot with short paths only, nesting
    /// one level per rename, then moved into place.
    pub fn unlistable_dir(&self, rel: &str) {
        let scratch = self._temp_dir.path();
        let segment = "d".repeat(200);

        let mut current = scratch.join("chain0");
        fs::create_dir(&current).expect("Failed to create chain dir");
        for i in 1..=24 {
            let next = scratch.join(format!("chain{}", i));
            fs::create_dir(&next).expect("Failed to create chain dir");
            fs::rename(&current, next.join(&segment)).expect("Failed to nest chain dir");
            current = next;
        }

        let dest = self.path(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::rename(&current, &dest).expect("Failed to move chain into sysroot");
    }

    /// Snapshot of the sysroot: relative path -> entry description.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        snapshot(&self.sysroot)
    }
}

/// Snapshot a tree without following links: relative path -> kind (and link target).
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    let mut map = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.expect("Failed to walk tree");
        let rel = entry
            .path()
            .strip_prefix(root)
            .expect("entry below root")
            .to_path_buf();
        let kind = if entry.file_type().is_symlink() {
            let target = fs::read_link(entry.path()).expect("Failed to read symlink");
            format!("link -> {}", target.display())
        } else if entry.file_type().is_dir() {
            "dir".to_string()
        } else {
            format!("file ({} bytes)", entry.metadata().expect("metadata").len())
        };
        map.insert(rel, kind);
    }
    map
}

/// Assert that a symlink exists and points to the expected target.
pub fn assert_symlink(path: &Path, expected_target: &Path) {
    assert!(
        path.is_symlink(),
        "Expected symlink at {}, but it's not a symlink",
        path.display()
    );

    let target = fs::read_link(path).expect("Failed to read symlink");
    assert_eq!(
        target,
        expected_target,
        "Symlink {} points to {:?}, expected {:?}",
        path.display(),
        target,
        expected_target
    );
}

/// Assert that a path exists (a dangling symlink counts).
pub fn assert_exists(path: &Path) {
    assert!(
        path.exists() || path.is_symlink(),
        "Expected path to exist: {}",
        path.display()
    );
}

/// Assert that nothing exists at a path.
pub fn assert_absent(path: &Path) {
    assert!(
        !path.exists() && !path.is_symlink(),
        "Expected path to be gone: {}",
        path.display()
    );
}
