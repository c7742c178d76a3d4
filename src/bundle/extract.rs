//! Style and script extraction passes.
//!
//! Every pass removes what it matches; only some matches contribute a
//! fragment. Tags that resolve, from their page, to the consolidated files
//! themselves stay in the page so that a second run finds it already linked.

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use super::{AssetKind, Bundle, rewrite_css_urls};
use crate::debug;
use crate::utils::path::{is_remote, normalize_ref, ref_key, resolve_href, root_relative};

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style([^>]*)>(.*?)</style>").unwrap());
static STYLESHEET_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<link[^>]*\srel=["']stylesheet["'][^>]*>"#).unwrap());
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script([^>]*)>(.*?)</script>").unwrap());

/// `<script src=...></script>` with nothing but whitespace inside.
static PAIRED_SRC_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*\ssrc=["'][^"']+["'][^>]*>\s*</script>"#).unwrap()
});
/// Self-closing or unclosed `<script src=...>`.
static OPEN_SRC_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<script[^>]*\ssrc=["'][^"']+["'][^>]*/?>"#).unwrap());

// Attribute names must follow whitespace, so `data-id` or `data-src` never
// count as `id` or `src`.
static ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:^|\s)id\s*=\s*["']([^"']+)["']"#).unwrap());
static HREF_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:^|\s)href\s*=\s*["']([^"']+)["']"#).unwrap());
static SRC_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:^|\s)src\s*=\s*["']([^"']+)["']"#).unwrap());

/// Fate of a matched tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Remove,
    Keep,
}

/// First capture of `re` inside `text`.
fn attr<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `replace_all` whose decision may fail.
///
/// After the first error the remaining matches are left untouched and the
/// error is returned.
fn try_replace_all<'h>(
    re: &Regex,
    haystack: &'h str,
    mut decide: impl FnMut(&Captures<'_>) -> Result<Tag>,
) -> Result<Cow<'h, str>> {
    let mut failure = None;
    let replaced = re.replace_all(haystack, |caps: &Captures<'_>| {
        if failure.is_some() {
            return caps[0].to_owned();
        }
        match decide(caps) {
            Ok(Tag::Remove) => String::new(),
            Ok(Tag::Keep) => caps[0].to_owned(),
            Err(err) => {
                failure = Some(err);
                caps[0].to_owned()
            }
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(replaced),
    }
}

pub(super) fn read_asset(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

impl Bundle {
    /// Pass 1: `<style>` blocks.
    pub(super) fn extract_styles(&mut self, page: &Path, html: &str) -> String {
        let origin = root_relative(&self.root, page);

        STYLE_BLOCK
            .replace_all(html, |caps: &Captures<'_>| {
                let id = attr(&ID_ATTR, &caps[1]);
                let css = &caps[2];
                let key = self.style_key(id, css);
                if !self.css.contains(&key) {
                    let comment = match id {
                        Some(id) => format!("/* From {origin} ({id}) */"),
                        None => format!("/* From {origin} */"),
                    };
                    self.css.push(key, format!("{comment}\n{}\n", css.trim()));
                }
                ""
            })
            .into_owned()
    }

    /// Pass 2: `<link rel="stylesheet">` tags.
    pub(super) fn extract_stylesheet_links(&mut self, page: &Path, html: &str) -> Result<String> {
        let out = try_replace_all(&STYLESHEET_LINK, html, |caps| {
            self.take_stylesheet_link(page, &caps[0])
        })?;
        Ok(out.into_owned())
    }

    fn take_stylesheet_link(&mut self, page: &Path, tag: &str) -> Result<Tag> {
        let Some(href) = attr(&HREF_ATTR, tag) else {
            return Ok(Tag::Remove);
        };
        if is_remote(href) {
            debug!("bundle"; "dropped remote stylesheet {}", href);
            return Ok(Tag::Remove);
        }
        if self.is_consolidated(page, href, AssetKind::Css) {
            return Ok(Tag::Keep);
        }

        let key = ref_key(href);
        if self.css.contains(&key) {
            return Ok(Tag::Remove);
        }

        let path = self.root.join(normalize_ref(href));
        if !path.is_file() {
            debug!("bundle"; "stylesheet {} not found, skipped", key);
            return Ok(Tag::Remove);
        }

        let css = rewrite_css_urls(&read_asset(&path)?, &path, &self.root);
        let fragment = format!("/* From {key} */\n{}\n", css.trim());
        self.css.push(key, fragment);
        Ok(Tag::Remove)
    }

    /// Pass 3 and 4: `<script>` blocks, with or without `src`.
    pub(super) fn extract_scripts(&mut self, page: &Path, html: &str) -> Result<String> {
        let out = try_replace_all(&SCRIPT_BLOCK, html, |caps| {
            let attrs = &caps[1];
            if let Some(src) = attr(&SRC_ATTR, attrs) {
                return self.take_script_src(page, src);
            }
            if let Some(id) = attr(&ID_ATTR, attrs) {
                self.take_inline_script(id, &caps[2]);
            }
            Ok(Tag::Remove)
        })?;
        Ok(out.into_owned())
    }

    fn take_script_src(&mut self, page: &Path, src: &str) -> Result<Tag> {
        if is_remote(src) {
            if self.policy.is_analytics_src(src) {
                debug!("bundle"; "dropped analytics script {}", src);
            } else {
                debug!("bundle"; "dropped remote script {}", src);
            }
            return Ok(Tag::Remove);
        }
        if self.is_consolidated(page, src, AssetKind::Js) {
            return Ok(Tag::Keep);
        }

        let key = ref_key(src);
        if !self.policy.allows_src(&key) {
            debug!("bundle"; "dropped script {} (not allowed)", key);
            return Ok(Tag::Remove);
        }
        if self.js.contains(&key) {
            return Ok(Tag::Remove);
        }

        let path = self.root.join(normalize_ref(src));
        if !path.is_file() {
            debug!("bundle"; "script {} not found, skipped", key);
            return Ok(Tag::Remove);
        }

        let fragment = format!("// From {key}\n{}\n", read_asset(&path)?.trim());
        self.js.push(key, fragment);
        Ok(Tag::Remove)
    }

    fn take_inline_script(&mut self, id: &str, body: &str) {
        if self.policy.denies_inline(id) {
            debug!("bundle"; "dropped analytics inline script {}", id);
            return;
        }
        if !self.policy.allows_inline(id) {
            return;
        }

        let key = format!("inline#{id}");
        if !self.js.contains(&key) {
            self.js
                .push(key, format!("// Inline script {id}\n{}\n", body.trim()));
        }
    }

    /// Final pass: leftover `<script src>` tags from malformed markup.
    pub(super) fn strip_residual_scripts(&self, page: &Path, html: &str) -> String {
        let html = PAIRED_SRC_SCRIPT.replace_all(html, |caps: &Captures<'_>| {
            self.keep_if_bundle_script(page, &caps[0])
        });
        OPEN_SRC_SCRIPT
            .replace_all(&html, |caps: &Captures<'_>| {
                self.keep_if_bundle_script(page, &caps[0])
            })
            .into_owned()
    }

    fn keep_if_bundle_script(&self, page: &Path, tag: &str) -> String {
        match attr(&SRC_ATTR, tag) {
            Some(src) if self.is_consolidated(page, src, AssetKind::Js) => tag.to_owned(),
            _ => String::new(),
        }
    }

    /// Whether `raw`, written in `page`, points at the consolidated file.
    ///
    /// Resolved against the page's directory, so `styles.css` inside
    /// `blog/` names `blog/styles.css` and does not count.
    fn is_consolidated(&self, page: &Path, raw: &str, kind: AssetKind) -> bool {
        let target = match kind {
            AssetKind::Css => &self.stylesheet_path,
            AssetKind::Js => &self.script_path,
        };
        !is_remote(raw) && resolve_href(&self.root, page, raw) == *target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn bundle(dir: &TempDir) -> Bundle {
        Bundle::new(&test_config(dir.path(), "")).unwrap()
    }

    fn index(dir: &TempDir) -> PathBuf {
        dir.path().join("index.html")
    }

    fn write(dir: &TempDir, rel: &str, content: &str) -> PathBuf {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_style_blocks_removed_and_keyed() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        let page = dir.path().join("blog/index.html");

        let html = r#"<head><style id="x">body{color:red}</style><STYLE media="all">
  p{margin:0}
</STYLE></head>"#;
        let out = bundle.extract_styles(&page, html);

        assert_eq!(out, "<head></head>");
        assert_eq!(
            bundle.buffer(AssetKind::Css).render(),
            "/* From blog/index.html (x) */\nbody{color:red}\n\n/* From blog/index.html */\np{margin:0}\n"
        );
    }

    #[test]
    fn test_same_id_across_pages_kept_once() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        let html = r#"<style id="x">body{color:red}</style>"#;

        bundle.extract_styles(&dir.path().join("a.html"), html);
        bundle.extract_styles(&dir.path().join("b.html"), html);

        let css = bundle.buffer(AssetKind::Css).render();
        assert_eq!(css.matches("body{color:red}").count(), 1);
        assert!(css.contains("/* From a.html (x) */"));
    }

    #[test]
    fn test_length_key_merges_equal_length_styles() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        bundle.extract_styles(&dir.path().join("a.html"), "<style>a{color:red}</style>");
        bundle.extract_styles(&dir.path().join("b.html"), "<style>a{color:tan}</style>");
        assert_eq!(bundle.buffer(AssetKind::Css).len(), 1);
    }

    #[test]
    fn test_content_key_keeps_equal_length_styles() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path(), "[bundle]\nstyle_key = \"content\"");
        let mut bundle = Bundle::new(&config).unwrap();
        bundle.extract_styles(&dir.path().join("a.html"), "<style>a{color:red}</style>");
        bundle.extract_styles(&dir.path().join("b.html"), "<style>a{color:tan}</style>");
        bundle.extract_styles(&dir.path().join("c.html"), "<style>a{color:red}</style>");
        assert_eq!(bundle.buffer(AssetKind::Css).len(), 2);
    }

    #[test]
    fn test_linked_stylesheet_inlined_with_rewritten_urls() {
        let dir = TempDir::new().unwrap();
        write(&dir, "sub/a.css", "a{background:url(img/x.png)}\n");
        let mut bundle = bundle(&dir);

        let html = r#"<link rel="stylesheet" href="./sub/a.css?ver=2" media="all"><link rel='stylesheet' href='https://fonts.example.com/a.css'><link rel="stylesheet" href="missing.css"><link rel="stylesheet">"#;
        let out = bundle.extract_stylesheet_links(&index(&dir), html).unwrap();

        assert_eq!(out, "");
        assert_eq!(
            bundle.buffer(AssetKind::Css).render(),
            "/* From /sub/a.css */\na{background:url(/sub/img/x.png)}\n"
        );
    }

    #[test]
    fn test_linked_stylesheet_dedup_by_normalized_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "wp/a.css", "a{}");
        let mut bundle = bundle(&dir);
        bundle
            .extract_stylesheet_links(&index(&dir), r#"<link rel="stylesheet" href="/wp/a.css">"#)
            .unwrap();
        bundle
            .extract_stylesheet_links(
                &dir.path().join("x/y/p.html"),
                r#"<link rel="stylesheet" href="../../wp/a.css?v=9">"#,
            )
            .unwrap();
        assert_eq!(bundle.buffer(AssetKind::Css).len(), 1);
    }

    #[test]
    fn test_non_stylesheet_links_untouched() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        let html = r#"<link rel="icon" href="/favicon.ico"><link rel="preload" href="/a.css">"#;
        assert_eq!(bundle.extract_stylesheet_links(&index(&dir), html).unwrap(), html);
    }

    #[test]
    fn test_analytics_script_removed_nothing_added() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        let html = r#"<body><script src="https://stats.wp.com/a.js"></script></body>"#;
        let out = bundle.extract_scripts(&index(&dir), html).unwrap();
        assert_eq!(out, "<body></body>");
        assert!(bundle.buffer(AssetKind::Js).is_empty());
    }

    #[test]
    fn test_allowed_local_script_inlined_once() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "wp-content/themes/go/dist/js/frontend.min.js",
            "\n  go();\n",
        );
        write(&dir, "wp-content/other.js", "evil();");
        let mut bundle = bundle(&dir);

        let html = concat!(
            r#"<script src="../wp-content/themes/go/dist/js/frontend.min.js?ver=1.8" id="go-frontend-js"></script>"#,
            r#"<script src="/wp-content/themes/go/dist/js/frontend.min.js"></script>"#,
            r#"<script src="/wp-content/other.js"></script>"#,
        );
        let out = bundle.extract_scripts(&index(&dir), html).unwrap();

        assert_eq!(out, "");
        assert_eq!(
            bundle.buffer(AssetKind::Js).render(),
            "// From /wp-content/themes/go/dist/js/frontend.min.js\ngo();\n"
        );
    }

    #[test]
    fn test_inline_scripts_allow_and_deny() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        let html = concat!(
            r#"<script id="go-frontend-js-extra">var goFrontend = {"a":1};</script>"#,
            r#"<script id="jetpack-stats-js-before">_stq = [];</script>"#,
            r#"<script id="unknown-js">x()</script>"#,
            r#"<script>anonymous()</script>"#,
            r#"<script type="text/javascript" id="go-frontend-js-extra">dup()</script>"#,
        );
        let out = bundle.extract_scripts(&index(&dir), html).unwrap();

        assert_eq!(out, "");
        assert_eq!(
            bundle.buffer(AssetKind::Js).render(),
            "// Inline script go-frontend-js-extra\nvar goFrontend = {\"a\":1};\n"
        );
    }

    #[test]
    fn test_data_attributes_are_not_id_or_src() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        let html = concat!(
            r#"<script data-id="go-frontend-js-extra">leak()</script>"#,
            r#"<script data-src="/wp-content/themes/go/dist/js/frontend.min.js" id="go-frontend-js-extra">kept()</script>"#,
        );
        let out = bundle.extract_scripts(&index(&dir), html).unwrap();

        assert_eq!(out, "");
        assert_eq!(
            bundle.buffer(AssetKind::Js).render(),
            "// Inline script go-frontend-js-extra\nkept()\n"
        );
    }

    #[test]
    fn test_residual_src_scripts_removed() {
        let dir = TempDir::new().unwrap();
        let bundle = bundle(&dir);
        let html = r#"<p><script src="a.js" /></p><script async src='b.js'>"#;
        assert_eq!(bundle.strip_residual_scripts(&index(&dir), html), "<p></p>");
    }

    #[test]
    fn test_bundle_script_tag_kept() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        let page = dir.path().join("blog/p.html");
        let html = r#"<body><script src="../script.js"></script></body>"#;
        let out = bundle.extract_scripts(&page, html).unwrap();
        let out = bundle.strip_residual_scripts(&page, &out);
        assert_eq!(out, html);
    }

    #[test]
    fn test_misdirected_bundle_references_replaced() {
        let dir = TempDir::new().unwrap();
        let mut bundle = bundle(&dir);
        let page = dir.path().join("blog/p.html");

        let html = r#"<head><link rel="stylesheet" href="styles.css"></head><body><script src="script.js"></script><script src="sub/script.js" /></body>"#;
        let out = bundle.process_page(&page, html).unwrap();

        assert!(!out.contains(r#"href="styles.css""#));
        assert!(!out.contains(r#"src="script.js""#));
        assert!(!out.contains("sub/script.js"));
        assert_eq!(out.matches(r#"href="../styles.css""#).count(), 1);
        assert_eq!(out.matches(r#"src="../script.js""#).count(), 1);
    }

    #[test]
    fn test_existing_outputs_seed_buffers_without_tags() {
        let dir = TempDir::new().unwrap();
        write(&dir, "styles.css", "\n/* From a.html (x) */\nbody{}\n\n");
        write(&dir, "script.js", "// Inline script a\nrun();\n");
        let bundle = bundle(&dir);

        assert_eq!(
            bundle.buffer(AssetKind::Css).render(),
            "/* From a.html (x) */\nbody{}\n"
        );
        assert_eq!(bundle.buffer(AssetKind::Js).render(), "// Inline script a\nrun();\n");
    }

    #[test]
    fn test_existing_stylesheet_link_kept() {
        let dir = TempDir::new().unwrap();
        write(&dir, "styles.css", "/* From /a.css */\na{}\n");
        let mut bundle = bundle(&dir);

        let html = r#"<link rel="stylesheet" href="styles.css">"#;
        assert_eq!(bundle.extract_stylesheet_links(&index(&dir), html).unwrap(), html);
        assert_eq!(
            bundle.buffer(AssetKind::Css).render(),
            "/* From /a.css */\na{}\n"
        );
    }

    #[test]
    fn test_unreadable_stylesheet_is_error() {
        let dir = TempDir::new().unwrap();
        // Invalid UTF-8 fails read_to_string
        let path = dir.path().join("bad.css");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let mut bundle = bundle(&dir);

        let err = bundle
            .extract_stylesheet_links(&index(&dir), r#"<link rel="stylesheet" href="bad.css">"#)
            .unwrap_err();
        assert!(err.to_string().contains("bad.css"));
    }
}
