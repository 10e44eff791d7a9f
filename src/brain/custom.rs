//! User-defined intent rules from the config file

use regex::Regex;
use serde::Deserialize;

/// Custom rule configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CustomRule {
    /// Regex pattern matched against the trimmed utterance
    pub pattern: String,
    /// Reply variants; `{text}` expands to the utterance
    pub replies: Vec<String>,
    /// Case insensitive matching
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
}

const fn default_true() -> bool {
    true
}

/// Compiled custom rule
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pattern: Regex,
    replies: Vec<String>,
}

impl CompiledRule {
    /// Compile a rule from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the regex pattern is invalid
    pub fn compile(rule: &CustomRule) -> Result<Self, regex::Error> {
        let pattern = if rule.case_insensitive {
            Regex::new(&format!("(?i){}", rule.pattern))?
        } else {
            Regex::new(&rule.pattern)?
        };

        Ok(Self {
            pattern,
            replies: rule.replies.clone(),
        })
    }

    /// Compile every rule, logging and skipping invalid ones
    #[must_use]
    pub fn compile_all(rules: &[CustomRule]) -> Vec<Self> {
        let compiled: Vec<_> = rules
            .iter()
            .filter_map(|r| {
                if r.replies.iter().all(|reply| reply.trim().is_empty()) {
                    tracing::warn!(pattern = %r.pattern, "custom rule has no replies, skipping");
                    return None;
                }
                match Self::compile(r) {
                    Ok(compiled) => Some(compiled),
                    Err(e) => {
                        tracing::warn!(
                            pattern = %r.pattern,
                            error = %e,
                            "invalid custom rule pattern, skipping"
                        );
                        None
                    }
                }
            })
            .collect();

        if !compiled.is_empty() {
            tracing::info!(count = compiled.len(), "loaded custom intent rules");
        }

        compiled
    }

    pub(crate) fn matches(&self, utterance: &str) -> bool {
        self.pattern.is_match(utterance)
    }

    /// Non-blank reply variants
    pub(crate) fn replies(&self) -> impl Iterator<Item = &str> {
        self.replies
            .iter()
            .map(String::as_str)
            .filter(|r| !r.trim().is_empty())
    }
}
