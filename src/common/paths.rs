//! Lexical path helpers for sysroot-relative path math.
//!
//! Nothing here touches the filesystem. Symlinks are never resolved, so a path
//! is judged purely by its components.

use std::path::{Component, Path, PathBuf};

/// Lexically clean a path.
///
/// Removes `.` components and resolves `..` against the preceding component.
/// `..` at the root of an absolute path is dropped (`/..` is `/`); leading `..`
/// of a relative path is kept.
///
/// ```ignore
/// assert_eq!(clean(Path::new("/s/./usr//lib/../include")), PathBuf::from("/s/usr/include"));
/// ```
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Join `path` under `root` as if `root` were `/`.
///
/// Absolute and relative inputs are both treated as rooted at `root`, and `..`
/// can never climb above it:
///
/// ```ignore
/// join_under(Path::new("/s"), Path::new("/usr/lib"));   // /s/usr/lib
/// join_under(Path::new("/s"), Path::new("../../etc"));  // /s/etc
/// ```
pub fn join_under(root: &Path, path: &Path) -> PathBuf {
    let rooted = clean(&Path::new("/").join(path));
    let relative = rooted.strip_prefix("/").unwrap_or(&rooted);
    clean(&root.join(relative))
}

/// Returns true if `path` is `root` or lies below it, component-wise.
///
/// `path` is cleaned first so that `<root>/../etc` is correctly rejected.
pub fn is_within(path: &Path, root: &Path) -> bool {
    clean(path).starts_with(root)
}
