//! `[preloader]` section: the loading-spinner block left by the export.
//!
//! ```toml
//! [preloader]
//! class = "preloader-plus"   # exact class attribute of the outer div
//! bundle_depth = 4           # closing </div> tags consumed by `bundle`
//! cleanup_depth = 2          # closing </div> tags consumed by `cleanup`
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreloaderConfig {
    pub class: String,
    pub bundle_depth: usize,
    pub cleanup_depth: usize,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            class: "preloader-plus".into(),
            bundle_depth: 4,
            cleanup_depth: 2,
        }
    }
}

impl PreloaderConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.class.trim().is_empty() {
            diag.error(FieldPath::new("preloader.class"), "must not be empty");
        }
        if self.bundle_depth == 0 {
            diag.error(FieldPath::new("preloader.bundle_depth"), "must be at least 1");
        }
        if self.cleanup_depth == 0 {
            diag.error(FieldPath::new("preloader.cleanup_depth"), "must be at least 1");
        }
    }
}
