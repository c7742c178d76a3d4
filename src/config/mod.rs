//! Run configuration from the optional `sitepack.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── bundle     # [bundle] and [bundle.scripts]
//! │   ├── pages      # [pages]
//! │   └── preloader  # [preloader]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # PackConfig (this file)
//! ```
//!
//! Without a config file every section falls back to the built-in defaults,
//! which match the WordPress export this tool was written for.

pub mod section;
pub mod types;

pub use section::{BundleConfig, PagesConfig, PreloaderConfig, ScriptPolicyConfig, StyleKey};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, debug, log, utils::path::normalize_path};
use anyhow::{Result, bail};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, looked up in the project root.
pub const DEFAULT_CONFIG_NAME: &str = "sitepack.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitepack.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackConfig {
    /// Project root directory holding the pages (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Page discovery settings
    #[serde(default)]
    pub pages: PagesConfig,

    /// Asset consolidation settings
    #[serde(default)]
    pub bundle: BundleConfig,

    /// Preloader markup settings
    #[serde(default)]
    pub preloader: PreloaderConfig,
}

impl PackConfig {
    /// Load configuration from CLI arguments.
    ///
    /// The root is `--root` or the current directory. The default config file
    /// is optional; a file named with `--config` must exist.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = normalize_path(cli.root.as_deref().unwrap_or(Path::new(".")));
        if !root.is_dir() {
            bail!("project root `{}` is not a directory", root.display());
        }

        let explicit = cli.config.is_some();
        let config_path = root.join(
            cli.config
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_CONFIG_NAME)),
        );

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else if explicit {
            bail!(ConfigError::Missing(config_path));
        } else {
            debug!("config"; "no {} in root, using built-in defaults", DEFAULT_CONFIG_NAME);
            Self::default()
        };

        config.root = root;
        config.finalize();
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    ///
    /// Batch runs have no one to answer a prompt, so unknown fields are
    /// reported and ignored.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Bring user-supplied values into the form the pipeline compares against.
    fn finalize(&mut self) {
        self.pages.extension = self.pages.extension.trim().to_owned();
        self.bundle.scripts.normalize();
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.pages.validate(&mut diag);
        self.bundle.validate(&mut diag);
        self.preloader.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the consolidated stylesheet.
    pub fn stylesheet_path(&self) -> PathBuf {
        self.root.join(&self.bundle.stylesheet)
    }

    /// Absolute path of the consolidated script.
    pub fn script_path(&self) -> PathBuf {
        self.root.join(&self.bundle.script)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config rooted at `root`, finalized like a loaded one.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_config(root: &Path, toml: &str) -> PackConfig {
    let (mut config, ignored) = PackConfig::parse_with_ignored(toml).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    config.root = root.to_path_buf();
    config.finalize();
    config.validate().unwrap();
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(PackConfig::from_str("[bundle\nscript = \"a.js\"").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = PackConfig::from_str("").unwrap();
        assert_eq!(config.pages.extension, "html");
        assert_eq!(config.bundle.stylesheet, "styles.css");
        assert_eq!(config.bundle.script, "script.js");
        assert_eq!(config.bundle.style_key, StyleKey::Length);
        assert_eq!(config.preloader.bundle_depth, 4);
        assert_eq!(config.preloader.cleanup_depth, 2);
        assert_eq!(config.bundle.scripts.allow_src.len(), 4);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = PackConfig::from_str(
            "[bundle]\nstyle_key = \"content\"\n[bundle.scripts]\nallow_inline = [\"x\"]",
        )
        .unwrap();
        assert_eq!(config.bundle.style_key, StyleKey::Content);
        assert_eq!(config.bundle.scripts.allow_inline, vec!["x"]);
        assert_eq!(config.bundle.scripts.deny_inline.len(), 4);
        assert_eq!(config.bundle.stylesheet, "styles.css");
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[pages]\nextension = \"htm\"\n[unknown_section]\nfield = 1";
        let (config, ignored) = PackConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.pages.extension, "htm");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_load_without_config_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["sitepack", "--root", &root, "bundle"]).unwrap();

        let config = PackConfig::load(&cli).unwrap();
        assert_eq!(config.get_root(), normalize_path(dir.path()));
        assert_eq!(config.stylesheet_path(), config.get_root().join("styles.css"));
    }

    #[test]
    fn test_load_explicit_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_string_lossy().into_owned();
        let cli =
            Cli::try_parse_from(["sitepack", "--root", &root, "-C", "nope.toml", "bundle"]).unwrap();

        let err = PackConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_load_reads_and_validates_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            "[bundle]\nscript = \"js/app.js\"",
        )
        .unwrap();
        let root = dir.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["sitepack", "--root", &root, "bundle"]).unwrap();

        let err = PackConfig::load(&cli).unwrap_err();
        let diag = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(diag, ConfigError::Diagnostics(d) if d.len() == 1));
    }
}
