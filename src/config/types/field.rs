//! Config field path used in diagnostics.

use crate::logger::paint;
use owo_colors::{Stream, Style};
use std::fmt;

/// Dotted path of a config field, e.g. `bundle.scripts`.
///
/// ```ignore
/// const SCRIPT: FieldPath = FieldPath::new("bundle.script");
/// diag.error(SCRIPT, "must not be empty");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = format!("`{}`", self.0);
        write!(f, "{}", paint(path, Stream::Stderr, Style::new().bright_blue()))
    }
}
