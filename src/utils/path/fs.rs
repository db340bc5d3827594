//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_path` - expand `~` and anchor relative paths at a base directory

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a configured path against a base directory.
///
/// `~` is expanded to the home directory; the result of joining a relative
/// path with `base` is normalized to an absolute path.
///
/// # Example
/// ```ignore
/// // blogport.toml lives in /home/me/blog, `posts = "_posts"`
/// let posts = resolve_path(Path::new("_posts"), Path::new("/home/me/blog"));
/// assert_eq!(posts, PathBuf::from("/home/me/blog/_posts"));
/// ```
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);

    if path.is_absolute() {
        return normalize_path(&path);
    }
    normalize_path(&base.join(path))
}
