//! Page discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;

/// Every regular file under `root` whose name ends in `.{extension}`,
/// compared case-insensitively, sorted by path.
///
/// Any directory that cannot be read fails the walk.
pub fn collect_pages(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(root).sort(true) {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file()
            && has_extension(&entry.file_name().to_string_lossy(), extension)
        {
            pages.push(entry.path());
        }
    }

    pages.sort();
    Ok(pages)
}

fn has_extension(name: &str, extension: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(extension))
}
