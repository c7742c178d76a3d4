//! Style and script consolidation.
//!
//! A [`Bundle`] is the accumulator for one run. Pages are fed to it one at a
//! time in sorted order; each call strips the page and appends newly seen
//! fragments to the CSS or JS buffer. [`Bundle::finish`] renders both buffers.
//!
//! ```text
//! page ─► preloader strip ─► <style> ─► <link rel=stylesheet> ─► <script> ─► residual <script src>
//!                               │              │                    │
//!                               └──── css ◄────┘          js ◄──────┘
//!      ─► ensure styles.css / script.js references ─► page text
//! ```

mod css;
mod extract;
mod inject;
mod policy;
mod preloader;

pub use css::rewrite_css_urls;
pub use inject::LinkInjector;
pub use policy::ScriptPolicy;
pub use preloader::Preloader;

use std::path::{Path, PathBuf};

use anyhow::Result;
use rustc_hash::FxHashSet;

use crate::config::{PackConfig, StyleKey};
use extract::read_asset;
use crate::utils::hash::content_hex;
use crate::utils::path::ref_key;

// ============================================================================
// Buffers
// ============================================================================

/// Which consolidated file a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Css,
    Js,
}

/// Ordered fragments of one kind plus the keys already taken.
///
/// A key enters at most once; the first fragment under a key wins.
#[derive(Debug, Default)]
pub struct AssetBuffer {
    fragments: Vec<String>,
    keys: FxHashSet<String>,
}

impl AssetBuffer {
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Append `fragment` under `key`. Returns false if the key was taken.
    pub fn push(&mut self, key: impl Into<String>, fragment: String) -> bool {
        if !self.keys.insert(key.into()) {
            return false;
        }
        self.fragments.push(fragment);
        true
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Final file text: fragments joined by blank lines, one trailing newline.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "\n".to_owned();
        }
        let mut out = self.fragments.join("\n").trim().to_owned();
        out.push('\n');
        out
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Rendered consolidated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    pub stylesheet: String,
    pub script: String,
    pub css_fragments: usize,
    pub js_fragments: usize,
}

/// Accumulator and rules for one consolidation run.
pub struct Bundle {
    root: PathBuf,
    style_key: StyleKey,
    policy: ScriptPolicy,
    preloader: Preloader,
    injector: LinkInjector,
    /// Dedup key of the consolidated stylesheet itself (`/styles.css`).
    stylesheet_key: String,
    /// Dedup key of the consolidated script itself (`/script.js`).
    script_key: String,
    stylesheet_path: PathBuf,
    script_path: PathBuf,
    css: AssetBuffer,
    js: AssetBuffer,
}

impl Bundle {
    /// Start a run, seeding both buffers with the consolidated files left by
    /// an earlier run, if any.
    pub fn new(config: &PackConfig) -> Result<Self> {
        let section = &config.bundle;
        let mut bundle = Self {
            root: config.get_root().to_path_buf(),
            style_key: section.style_key,
            policy: ScriptPolicy::new(&section.scripts),
            preloader: Preloader::new(&config.preloader.class, config.preloader.bundle_depth)?,
            injector: LinkInjector::new(&section.stylesheet, &section.script)?,
            stylesheet_key: ref_key(&section.stylesheet),
            script_key: ref_key(&section.script),
            stylesheet_path: config.stylesheet_path(),
            script_path: config.script_path(),
            css: AssetBuffer::default(),
            js: AssetBuffer::default(),
        };
        bundle.carry_forward(AssetKind::Css)?;
        bundle.carry_forward(AssetKind::Js)?;
        Ok(bundle)
    }

    /// Rewrite one page, collecting its styles and scripts.
    ///
    /// Reads referenced stylesheets and scripts from disk; any read error
    /// aborts the run.
    pub fn process_page(&mut self, page: &Path, html: &str) -> Result<String> {
        let html = self.preloader.strip(html);
        let html = self.extract_styles(page, &html);
        let html = self.extract_stylesheet_links(page, &html)?;
        let html = self.extract_scripts(page, &html)?;
        let html = self.strip_residual_scripts(page, &html);
        Ok(self.injector.ensure_links(&html, &self.root, page))
    }

    /// Fragments collected so far, per kind.
    #[cfg(test)]
    pub fn buffer(&self, kind: AssetKind) -> &AssetBuffer {
        match kind {
            AssetKind::Css => &self.css,
            AssetKind::Js => &self.js,
        }
    }

    /// Render both consolidated files.
    pub fn finish(self) -> BundleOutput {
        BundleOutput {
            stylesheet: self.css.render(),
            script: self.js.render(),
            css_fragments: self.css.len(),
            js_fragments: self.js.len(),
        }
    }

    /// Keep the current content of a consolidated file as a fragment.
    ///
    /// The content was rendered by an earlier run, so it goes in verbatim,
    /// without an origin comment.
    fn carry_forward(&mut self, kind: AssetKind) -> Result<()> {
        let (key, path, buffer) = match kind {
            AssetKind::Css => (&self.stylesheet_key, &self.stylesheet_path, &mut self.css),
            AssetKind::Js => (&self.script_key, &self.script_path, &mut self.js),
        };
        if !path.is_file() {
            return Ok(());
        }

        let content = read_asset(path)?;
        buffer.push(key.as_str(), format!("{}\n", content.trim()));
        Ok(())
    }

    /// Dedup key for a `<style>` block.
    fn style_key(&self, id: Option<&str>, css: &str) -> String {
        match (id, self.style_key) {
            (Some(id), _) => format!("style#{id}"),
            (None, StyleKey::Length) => format!("style@{}", css.chars().count()),
            (None, StyleKey::Content) => format!("style@{}", content_hex(css)),
        }
    }
}
