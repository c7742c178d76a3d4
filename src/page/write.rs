//! In-place page writes and consolidated file output.
//!
//! Pages are only touched when their text changed. In [`WriteMode::DryRun`]
//! every write is reported instead of performed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::utils::path::root_relative;
use crate::{debug, log};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Apply,
    DryRun,
}

impl WriteMode {
    pub const fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Self::DryRun } else { Self::Apply }
    }

    #[inline]
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// Writes files below one root.
#[derive(Debug, Clone)]
pub struct PageWriter {
    root: PathBuf,
    mode: WriteMode,
}

impl PageWriter {
    pub fn new(root: &Path, mode: WriteMode) -> Self {
        Self {
            root: root.to_path_buf(),
            mode,
        }
    }

    /// Write `updated` over `path` if it differs from `original`.
    ///
    /// Returns whether the page changed, whether or not it was written.
    pub fn page(&self, path: &Path, original: &str, updated: &str) -> Result<bool> {
        if original == updated {
            return Ok(false);
        }

        let rel = root_relative(&self.root, path);
        if self.mode.is_dry_run() {
            log!("dry-run"; "would rewrite {}", rel);
            return Ok(true);
        }

        fs::write(path, updated).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("write"; "{}", rel);
        Ok(true)
    }

    /// Write a consolidated file, replacing whatever was there.
    pub fn output(&self, path: &Path, content: &str) -> Result<()> {
        let rel = root_relative(&self.root, path);
        if self.mode.is_dry_run() {
            log!("dry-run"; "would write {} ({} bytes)", rel, content.len());
            return Ok(());
        }

        if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
            debug!("write"; "{} unchanged", rel);
            return Ok(());
        }

        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("write"; "{}", rel);
        Ok(())
    }
}
