//! `bundle` command: consolidate styles and scripts across every page.
//!
//! Phases:
//! - **Collect** - walk the root for pages, sorted
//! - **Rewrite** - feed each page through the [`Bundle`], write it back if changed
//! - **Flush** - write the stylesheet and script once, after the last page

use std::fs;

use anyhow::{Context, Result};

use crate::{
    bundle::Bundle,
    cli::RunArgs,
    config::PackConfig,
    log,
    logger::ProgressLine,
    page::{PageWriter, WriteMode, collect_pages},
    utils::plural_count,
};

/// Counts reported at the end of a bundle run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BundleSummary {
    pub pages: usize,
    pub changed: usize,
    pub css_fragments: usize,
    pub js_fragments: usize,
}

pub fn run_bundle(config: &PackConfig, args: &RunArgs) -> Result<BundleSummary> {
    let root = config.get_root();
    let pages = collect_pages(root, &config.pages.extension)?;
    let writer = PageWriter::new(root, WriteMode::from_dry_run(args.dry_run));
    let mut bundle = Bundle::new(config)?;

    let progress = create_progress(pages.len(), args.verbose);
    let mut changed = 0;

    for page in &pages {
        let html = fs::read_to_string(page)
            .with_context(|| format!("failed to read {}", page.display()))?;
        let updated = bundle.process_page(page, &html)?;
        if writer.page(page, &html, &updated)? {
            changed += 1;
        }
        progress.inc("pages");
    }
    progress.finish();

    let output = bundle.finish();
    writer.output(&config.stylesheet_path(), &output.stylesheet)?;
    writer.output(&config.script_path(), &output.script)?;

    let summary = BundleSummary {
        pages: pages.len(),
        changed,
        css_fragments: output.css_fragments,
        js_fragments: output.js_fragments,
    };
    log_summary(config, &summary);

    Ok(summary)
}

/// Page counter, hidden when verbose output would interleave with it.
fn create_progress(total: usize, verbose: bool) -> ProgressLine {
    let items = [("pages", total)];
    if verbose || total == 0 {
        ProgressLine::hidden("bundle", &items)
    } else {
        ProgressLine::new("bundle", &items)
    }
}

fn log_summary(config: &PackConfig, summary: &BundleSummary) {
    log!(
        "bundle";
        "{} -> {}, {} -> {}",
        plural_count(summary.css_fragments, "style fragment"),
        config.bundle.stylesheet,
        plural_count(summary.js_fragments, "script fragment"),
        config.bundle.script
    );
    if summary.changed < summary.pages {
        log!("bundle"; "{} already up to date", plural_count(summary.pages - summary.changed, "page"));
    }
    log!("bundle"; "processed {}", plural_count(summary.pages, "html file"));
}
