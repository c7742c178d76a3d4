//! `[bundle]` section: consolidated output names and script policy.
//!
//! # Example
//!
//! ```toml
//! [bundle]
//! stylesheet = "styles.css"   # written at the project root
//! script = "script.js"        # written at the project root
//! style_key = "length"        # key for <style> without id: length | content
//!
//! [bundle.scripts]
//! allow_src = ["/wp-content/themes/go/dist/js/frontend.min.js"]
//! allow_inline = ["go-frontend-js-extra"]
//! deny_inline = ["jetpack-stats-js"]
//! deny_src_snippets = ["stats.wp.com"]
//! ```
//!
//! Every list replaces its built-in default when present.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::ref_key;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// File name of the consolidated stylesheet.
    pub stylesheet: String,
    /// File name of the consolidated script.
    pub script: String,
    /// Dedup key used for `<style>` blocks without an `id`.
    pub style_key: StyleKey,
    /// Which scripts get inlined and which are analytics.
    pub scripts: ScriptPolicyConfig,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            stylesheet: "styles.css".into(),
            script: "script.js".into(),
            style_key: StyleKey::default(),
            scripts: ScriptPolicyConfig::default(),
        }
    }
}

/// Dedup key for anonymous `<style>` blocks.
///
/// `Length` treats any two blocks of equal length as the same block, so a
/// distinct block can be dropped. `Content` hashes the text instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKey {
    #[default]
    Length,
    Content,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptPolicyConfig {
    /// Local script sources that are inlined into the script bundle.
    pub allow_src: Vec<String>,
    /// Inline `<script id>` blocks that are inlined into the script bundle.
    pub allow_inline: Vec<String>,
    /// Inline `<script id>` blocks that belong to analytics.
    pub deny_inline: Vec<String>,
    /// Substrings identifying analytics endpoints in remote sources.
    pub deny_src_snippets: Vec<String>,
}

impl Default for ScriptPolicyConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| (*s).to_owned()).collect() };
        Self {
            allow_src: owned(&[
                "/wp-content/plugins/coblocks/dist/js/vendors/tiny-swiper.js",
                "/wp-content/plugins/coblocks/dist/js/coblocks-animation.js",
                "/wp-content/plugins/coblocks/dist/js/coblocks-tinyswiper-initializer.js",
                "/wp-content/themes/go/dist/js/frontend.min.js",
            ]),
            allow_inline: owned(&[
                "coblocks-tinyswiper-initializer-js-extra",
                "go-frontend-js-extra",
            ]),
            deny_inline: owned(&[
                "jetpack-stats-js-before",
                "woocommerce-analytics-js",
                "woocommerce-analytics-client-js",
                "jetpack-stats-js",
            ]),
            deny_src_snippets: owned(&[
                "stats.wp.com",
                "woocommerce-analytics",
                "sourcebuster",
                "tccl-tti.min.js",
            ]),
        }
    }
}

impl ScriptPolicyConfig {
    /// Bring `allow_src` entries into dedup-key form (`/path/without/query`).
    pub fn normalize(&mut self) {
        for src in &mut self.allow_src {
            *src = ref_key(src);
        }
    }
}

impl BundleConfig {
    const STYLESHEET: FieldPath = FieldPath::new("bundle.stylesheet");
    const SCRIPT: FieldPath = FieldPath::new("bundle.script");
    const SCRIPTS: FieldPath = FieldPath::new("bundle.scripts");

    /// # Checks
    /// - `stylesheet` and `script` are plain, distinct file names
    /// - no list contains an empty entry
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        Self::validate_file_name(&self.stylesheet, Self::STYLESHEET, diag);
        Self::validate_file_name(&self.script, Self::SCRIPT, diag);

        if self.stylesheet.eq_ignore_ascii_case(&self.script) {
            diag.error(
                Self::SCRIPT,
                format!("must differ from {}", Self::STYLESHEET.as_str()),
            );
        }

        let scripts = &self.scripts;
        let lists = [
            ("allow_src", &scripts.allow_src),
            ("allow_inline", &scripts.allow_inline),
            ("deny_inline", &scripts.deny_inline),
            ("deny_src_snippets", &scripts.deny_src_snippets),
        ];
        for (name, list) in lists {
            if list.iter().any(|item| item.trim().is_empty()) {
                diag.error(Self::SCRIPTS, format!("`{name}` contains an empty entry"));
            }
        }
    }

    fn validate_file_name(name: &str, field: FieldPath, diag: &mut ConfigDiagnostics) {
        if name.trim().is_empty() {
            diag.error(field, "must not be empty");
        } else if name.contains(['/', '\\']) {
            diag.error_with_hint(
                field,
                "must be a file name, not a path",
                "outputs are always written at the project root",
            );
        }
    }
}
