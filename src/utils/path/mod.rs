//! Path and reference utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem paths (`normalize_path`, `resolve_lexical`, `resolve_href`, `relative_href`)
//! - [`route`]: Raw `href`/`src` references (`normalize_ref`, `ref_key`, `is_remote`)

pub mod fs;
pub mod route;

pub use fs::{normalize_path, relative_href, resolve_href, resolve_lexical, root_relative};
pub use route::{has_prefix_ignore_case, is_remote, normalize_ref, ref_key};
