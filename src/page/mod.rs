//! Exported pages on disk: discovery and in-place writes.

mod scan;
mod write;

pub use scan::collect_pages;
pub use write::{PageWriter, WriteMode};
