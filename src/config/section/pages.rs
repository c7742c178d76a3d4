//! `[pages]` section: which files count as pages.
//!
//! ```toml
//! [pages]
//! extension = "html"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// File extension of pages, matched case-insensitively, without the dot.
    pub extension: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            extension: "html".into(),
        }
    }
}

impl PagesConfig {
    const EXTENSION: FieldPath = FieldPath::new("pages.extension");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extension.trim().is_empty() {
            diag.error(Self::EXTENSION, "must not be empty");
        } else if self.extension.starts_with('.') {
            diag.error_with_hint(
                Self::EXTENSION,
                "must not start with a dot",
                format!("use `{}`", self.extension.trim_start_matches('.')),
            );
        }
    }
}
