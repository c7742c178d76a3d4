//! `url(...)` rewriting for stylesheets moved to the project root.
//!
//! A stylesheet at `/sub/a.css` that says `url(img/x.png)` means
//! `/sub/img/x.png`. Once its text lives in `/styles.css` the same relative
//! reference would point at `/img/x.png`, so every relative reference is
//! rewritten to its root-absolute form while the text is extracted.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::path::{has_prefix_ignore_case, resolve_lexical, root_relative};

/// `url(` + optional quote + target + same quote + `)`.
///
/// One alternative per quote style, so the closing quote always matches the
/// opening one.
static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:'([^'")]+)'|"([^'")]+)"|([^'")]+))\s*\)"#).unwrap()
});

/// Targets that are already absolute or not paths at all.
const SKIPPED_PREFIXES: &[&str] = &["data:", "http:", "https:", "#", "/"];

/// Rewrite relative `url(...)` references in `css`, read from `source_file`.
///
/// References resolving outside `root` are left as they were.
pub fn rewrite_css_urls(css: &str, source_file: &Path, root: &Path) -> String {
    let source_dir = source_file.parent().unwrap_or(root);

    CSS_URL
        .replace_all(css, |caps: &Captures<'_>| {
            let (quote, target) = if let Some(m) = caps.get(1) {
                ("'", m.as_str())
            } else if let Some(m) = caps.get(2) {
                ("\"", m.as_str())
            } else {
                ("", caps.get(3).map_or("", |m| m.as_str().trim_end()))
            };

            rewrite_target(target, source_dir, root)
                .map_or_else(|| caps[0].to_owned(), |abs| format!("url({quote}{abs}{quote})"))
        })
        .into_owned()
}

/// Root-absolute form of `target`, or `None` to keep the original text.
fn rewrite_target(target: &str, source_dir: &Path, root: &Path) -> Option<String> {
    if target.is_empty()
        || SKIPPED_PREFIXES
            .iter()
            .any(|prefix| has_prefix_ignore_case(target, prefix))
    {
        return None;
    }

    let resolved = resolve_lexical(source_dir, target);
    if !resolved.starts_with(root) {
        return None;
    }
    Some(format!("/{}", root_relative(root, &resolved)))
}
