//! Script allow/deny decisions.

use rustc_hash::FxHashSet;

use crate::config::ScriptPolicyConfig;

/// Read-only lookup sets built once per run from `[bundle.scripts]`.
#[derive(Debug, Default)]
pub struct ScriptPolicy {
    allow_src: FxHashSet<String>,
    allow_inline: FxHashSet<String>,
    deny_inline: FxHashSet<String>,
    deny_src_snippets: Vec<String>,
}

impl ScriptPolicy {
    /// `config.allow_src` must already be in dedup-key form.
    pub fn new(config: &ScriptPolicyConfig) -> Self {
        Self {
            allow_src: config.allow_src.iter().cloned().collect(),
            allow_inline: config.allow_inline.iter().cloned().collect(),
            deny_inline: config.deny_inline.iter().cloned().collect(),
            deny_src_snippets: config.deny_src_snippets.clone(),
        }
    }

    /// Whether a local script with dedup key `key` may be inlined.
    #[inline]
    pub fn allows_src(&self, key: &str) -> bool {
        self.allow_src.contains(key)
    }

    #[inline]
    pub fn allows_inline(&self, id: &str) -> bool {
        self.allow_inline.contains(id)
    }

    #[inline]
    pub fn denies_inline(&self, id: &str) -> bool {
        self.deny_inline.contains(id)
    }

    /// Whether a remote source is a known analytics endpoint.
    pub fn is_analytics_src(&self, src: &str) -> bool {
        self.deny_src_snippets
            .iter()
            .any(|snippet| src.contains(snippet.as_str()))
    }
}
