//! Filesystem mutations used by the sysroot tools.
//!
//! Directory listing goes through `walkdir`; everything that reads a link or
//! changes the tree goes through [`FsOps`] so tests can inject failures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The filesystem operations the tools perform on individual entries.
pub trait FsOps: Send + Sync {
    /// Read the literal target text of a symlink (no resolution).
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Remove a single non-directory entry (file or symlink).
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Remove `path` and, if it is a directory, everything below it.
    ///
    /// Symlinks are removed, never followed.
    fn remove_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` pointing at `target`.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Rename `from` to `to`, replacing `to` atomically if it exists.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FsOps`] backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl FsOps for HostFs {
    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            // Already gone counts as removed
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_all_directory_tree() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("tmp/a/b");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("f"), "x").unwrap();

        HostFs.remove_all(&temp.path().join("tmp")).unwrap();
        assert!(!temp.path().join("tmp").exists());
    }

    #[test]
    fn test_remove_all_symlink_does_not_follow() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        fs::create_dir_all(&real).unwrap();
        fs::write(real.join("keep-me"), "x").unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        HostFs.remove_all(&link).unwrap();
        assert!(!link.is_symlink());
        assert!(real.join("keep-me").exists());
    }

    #[test]
    fn test_remove_all_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        HostFs.remove_all(&temp.path().join("nope")).unwrap();
    }

    #[test]
    fn test_rename_replaces_existing_link() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("x");
        let tmp = temp.path().join(".x.tmp");
        HostFs.symlink(Path::new("/old"), &link).unwrap();
        HostFs.symlink(Path::new("/new"), &tmp).unwrap();

        HostFs.rename(&tmp, &link).unwrap();
        assert_eq!(HostFs.read_link(&link).unwrap(), PathBuf::from("/new"));
        assert!(!tmp.is_symlink());
    }

    #[test]
    fn test_read_link_returns_literal_target() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("x");
        HostFs.symlink(Path::new("/usr/local/y"), &link).unwrap();
        assert_eq!(HostFs.read_link(&link).unwrap(), PathBuf::from("/usr/local/y"));
    }
}
