//! Filesystem path utilities.
//!
//! - `normalize_path` - absolute form of a user-supplied path
//! - `resolve_lexical` - join and collapse `.`/`..` without touching disk
//! - `resolve_href` - file a page reference points at
//! - `root_relative` - display a path relative to the project root
//! - `relative_href` - link from a page to a root-level file

use std::path::{Component, Path, PathBuf};

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

/// Resolve `rel` against `base_dir` lexically.
///
/// `..` above the filesystem root stays at the root, matching how a browser
/// resolves `url(../../x.png)`. Backslashes in `rel` are treated as
/// separators.
pub fn resolve_lexical(base_dir: &Path, rel: &str) -> PathBuf {
    let joined = base_dir.join(rel.replace('\\', "/"));
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// File that `raw`, an `href`/`src` written in `page`, points at.
///
/// A leading `/` resolves from `root`, anything else from the page's
/// directory. Query and fragment are ignored.
///
/// # Examples
/// ```ignore
/// resolve_href(root, &root.join("blog/p.html"), "../styles.css")  // root/styles.css
/// resolve_href(root, &root.join("blog/p.html"), "styles.css")     // root/blog/styles.css
/// ```
pub fn resolve_href(root: &Path, page: &Path, raw: &str) -> PathBuf {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    match path.strip_prefix(['/', '\\']) {
        Some(abs) => resolve_lexical(root, abs.trim_start_matches(['/', '\\'])),
        None => resolve_lexical(page.parent().unwrap_or(root), path),
    }
}

/// Path relative to `root`, with forward slashes.
///
/// Falls back to the full path if `path` is not under `root`.
pub fn root_relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Href from `page` to the root-level file `file_name`.
///
/// # Examples
/// ```ignore
/// relative_href(root, &root.join("index.html"), "styles.css")        // "styles.css"
/// relative_href(root, &root.join("a/b/index.html"), "styles.css")    // "../../styles.css"
/// ```
pub fn relative_href(root: &Path, page: &Path, file_name: &str) -> String {
    let depth = page
        .parent()
        .and_then(|dir| dir.strip_prefix(root).ok())
        .map_or(0, |rel| {
            rel.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        });
    format!("{}{file_name}", "../".repeat(depth))
}
