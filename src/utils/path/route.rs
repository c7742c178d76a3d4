//! Reference handling for `href`/`src` attribute values.
//!
//! Export tools write references in every shape: `./wp-content/x.css`,
//! `../../wp-content/x.css?ver=6.1`, `\wp-content\x.css`. These helpers fold
//! them into one root-relative spelling so the same file always yields the
//! same dedup key.

/// Case-insensitive ASCII prefix check that never slices inside a char.
#[inline]
pub fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Check if a reference points at a remote `http(s)://` resource.
///
/// # Examples
/// ```ignore
/// assert!(is_remote("https://stats.wp.com/e.js"));
/// assert!(is_remote("HTTP://example.com/a.css"));
/// assert!(!is_remote("//cdn.example.com/a.css"));
/// assert!(!is_remote("/wp-content/a.css"));
/// ```
#[inline]
pub fn is_remote(link: &str) -> bool {
    has_prefix_ignore_case(link, "http://") || has_prefix_ignore_case(link, "https://")
}

/// Normalize a raw reference into a root-relative path.
///
/// 1. strip the leading run of `.`, `/`, `\`
/// 2. backslashes become forward slashes
/// 3. drop the query string
/// 4. strip remaining leading slashes
///
/// The result never starts with `.`, `/` or `\` and contains no `?`, so
/// normalizing it again returns it unchanged.
///
/// # Examples
/// ```ignore
/// assert_eq!(normalize_ref("../../wp-content/a.css?ver=1"), "wp-content/a.css");
/// assert_eq!(normalize_ref(r".\sub\a.css"), "sub/a.css");
/// ```
pub fn normalize_ref(raw: &str) -> String {
    let cleaned = raw.trim_start_matches(['.', '/', '\\']).replace('\\', "/");
    let path = cleaned.split('?').next().unwrap_or_default();
    path.trim_start_matches('/').to_owned()
}

/// Dedup key for a local reference: the normalized path with a leading `/`.
#[inline]
pub fn ref_key(raw: &str) -> String {
    format!("/{}", normalize_ref(raw))
}
