//! Links each page to the consolidated stylesheet and script.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::utils::path::relative_href;

static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head>").unwrap());
static BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</body>").unwrap());

/// Inserts `<link>`/`<script>` tags for the consolidated files when missing.
#[derive(Debug, Clone)]
pub struct LinkInjector {
    stylesheet: String,
    script: String,
    /// Any `<link>` whose href ends in the stylesheet name.
    stylesheet_link: Regex,
    /// Any `<script>` whose src ends in the script name.
    script_tag: Regex,
}

impl LinkInjector {
    pub fn new(stylesheet: &str, script: &str) -> Result<Self> {
        let stylesheet_link = Regex::new(&format!(
            r#"(?i)<link[^>]*\shref=["'][^"']*{}["']"#,
            regex::escape(stylesheet)
        ))?;
        let script_tag = Regex::new(&format!(
            r#"(?i)<script[^>]*\ssrc=["'][^"']*{}["']"#,
            regex::escape(script)
        ))?;

        Ok(Self {
            stylesheet: stylesheet.to_owned(),
            script: script.to_owned(),
            stylesheet_link,
            script_tag,
        })
    }

    /// Ensure `html` (the page at `page`) references both consolidated files.
    ///
    /// The link goes right before `</head>`, the script right before
    /// `</body>`. A page without the closing tag is left as is.
    pub fn ensure_links(&self, html: &str, root: &Path, page: &Path) -> String {
        let mut html = html.to_owned();

        if !self.stylesheet_link.is_match(&html) {
            let href = relative_href(root, page, &self.stylesheet);
            html = insert_before(
                &html,
                &HEAD_CLOSE,
                &format!("  <link rel=\"stylesheet\" href=\"{href}\">\n"),
            );
        }

        if !self.script_tag.is_match(&html) {
            let src = relative_href(root, page, &self.script);
            html = insert_before(
                &html,
                &BODY_CLOSE,
                &format!("  <script src=\"{src}\"></script>\n"),
            );
        }

        html
    }
}

/// Insert `snippet` before the first match of `anchor`.
fn insert_before(html: &str, anchor: &Regex, snippet: &str) -> String {
    match anchor.find(html) {
        Some(m) => format!("{}{}{}", &html[..m.start()], snippet, &html[m.start()..]),
        None => html.to_owned(),
    }
}
