//! Loading-spinner ("preloader") markup removal.
//!
//! The export leaves a fixed block behind:
//!
//! ```html
//! <div class="preloader-plus"> <div class="preloader-content">
//!   <div class="prog-bar"></div> ... </div></div></div></div>
//! ```
//!
//! There is no parser here: the block is the marker div, lazily up to the
//! first `</div>`, then `depth - 1` more `</div>` separated by whitespace.

use std::borrow::Cow;

use anyhow::Result;
use regex::Regex;

/// Compiled matcher for one marker class and closing depth.
#[derive(Debug, Clone)]
pub struct Preloader {
    block: Regex,
}

impl Preloader {
    pub fn new(class: &str, depth: usize) -> Result<Self> {
        let closing = r"\s*</div>".repeat(depth.saturating_sub(1));
        let pattern = format!(
            r#"(?is)<div class="{}".*?</div>{closing}"#,
            regex::escape(class)
        );
        Ok(Self {
            block: Regex::new(&pattern)?,
        })
    }

    /// Whether `html` contains at least one block.
    #[inline]
    pub fn is_match(&self, html: &str) -> bool {
        self.block.is_match(html)
    }

    /// Remove every block from `html`.
    pub fn strip<'h>(&self, html: &'h str) -> Cow<'h, str> {
        self.block.replace_all(html, "")
    }
}
