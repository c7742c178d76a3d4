//! `cleanup` command: strip preloader markup and nothing else.

use std::fs;

use anyhow::{Context, Result};

use crate::{
    bundle::Preloader,
    cli::RunArgs,
    config::PackConfig,
    debug, log,
    page::{PageWriter, WriteMode, collect_pages},
    utils::{path::root_relative, plural_count},
};

/// Remove every preloader block from every page.
///
/// Returns the number of pages that held at least one block.
pub fn run_cleanup(config: &PackConfig, args: &RunArgs) -> Result<usize> {
    let root = config.get_root();
    let preloader = Preloader::new(&config.preloader.class, config.preloader.cleanup_depth)?;
    let writer = PageWriter::new(root, WriteMode::from_dry_run(args.dry_run));

    let mut cleaned = 0;
    for page in collect_pages(root, &config.pages.extension)? {
        let html = fs::read_to_string(&page)
            .with_context(|| format!("failed to read {}", page.display()))?;
        if !preloader.is_match(&html) {
            continue;
        }

        let stripped = preloader.strip(&html);
        if writer.page(&page, &html, &stripped)? {
            debug!("cleanup"; "{}", root_relative(root, &page));
            cleaned += 1;
        }
    }

    log!("cleanup"; "removed preloader markup from {}", plural_count(cleaned, "file"));
    Ok(cleaned)
}
