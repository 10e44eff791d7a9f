//! Intent-response engine
//!
//! Maps an utterance to a reply by testing ordered intent rules against the
//! normalized text. The first matching category wins; within a category one
//! reply variant is chosen through the injected [`IndexPicker`].
//!
//! ```text
//! greeting → identity → time → day/date → thanks → joke → motivation
//!          → arithmetic → weather → custom rules → fallback echo
//! ```

mod arithmetic;
mod clock;
mod custom;
mod picker;
mod rules;

pub use arithmetic::{Expression, Number, Operator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use custom::{CompiledRule, CustomRule};
pub use picker::{IndexPicker, RandomPicker, SeededPicker, SequencePicker};
pub use rules::{Intent, NO_INPUT_REPLY, PLACEHOLDER_TEMPERATURE};

use regex::Captures;
use serde::Serialize;

use rules::{BUILTIN_RULES, FALLBACKS};

/// A computed reply and the category that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

/// Template values for one reply
type Bindings = Vec<(&'static str, String)>;

/// Rule-based reply engine
pub struct ResponseEngine {
    picker: Box<dyn IndexPicker>,
    clock: Box<dyn Clock>,
    custom: Vec<CompiledRule>,
}

impl Default for ResponseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResponseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseEngine")
            .field("custom_rules", &self.custom.len())
            .finish_non_exhaustive()
    }
}

impl ResponseEngine {
    /// Engine with random variant selection and the system clock
    #[must_use]
    pub fn new() -> Self {
        Self {
            picker: Box::new(RandomPicker),
            clock: Box::new(SystemClock),
            custom: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_picker(mut self, picker: impl IndexPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Add config-file rules; invalid ones are logged and skipped
    #[must_use]
    pub fn with_custom_rules(mut self, rules: &[CustomRule]) -> Self {
        self.custom = CompiledRule::compile_all(rules);
        self
    }

    /// Compute the reply for an utterance
    ///
    /// Never fails and never returns empty text.
    #[must_use]
    pub fn respond(&self, utterance: &str) -> Reply {
        let normalized = utterance.trim().to_lowercase();
        if normalized.is_empty() {
            return Reply {
                intent: Intent::NoInput,
                text: NO_INPUT_REPLY.to_string(),
            };
        }

        for rule in BUILTIN_RULES.iter() {
            let Some(caps) = rule.pattern.captures(&normalized) else {
                continue;
            };
            let Some(bindings) = self.bind(rule.intent, &normalized, &caps) else {
                continue;
            };

            tracing::debug!(intent = %rule.intent, "intent matched");
            return Reply {
                intent: rule.intent,
                text: self.render(rule.responses, &bindings),
            };
        }

        let trimmed = utterance.trim();
        for rule in &self.custom {
            if rule.matches(trimmed) {
                let replies: Vec<&str> = rule.replies().collect();
                tracing::debug!("custom rule matched");
                return Reply {
                    intent: Intent::Custom,
                    text: self.render(&replies, &[("text", utterance.to_string())]),
                };
            }
        }

        Reply {
            intent: Intent::Fallback,
            text: self.render(FALLBACKS, &[("text", utterance.to_string())]),
        }
    }

    /// Template values for a matched category, or `None` if the match doesn't hold up
    fn bind(&self, intent: Intent, normalized: &str, caps: &Captures<'_>) -> Option<Bindings> {
        let bindings = match intent {
            Intent::Time => {
                let now = self.clock.now();
                vec![("time", now.format("%-I:%M:%S %p").to_string())]
            }
            Intent::Day => {
                let now = self.clock.now();
                vec![
                    ("weekday", now.format("%A").to_string()),
                    ("date", now.format("%B %-d, %Y").to_string()),
                ]
            }
            Intent::Arithmetic => {
                let expr = Expression::find(normalized)?;
                vec![("result", Number(expr.evaluate()).to_string())]
            }
            Intent::Weather => vec![
                ("city", title_case(caps.get(1)?.as_str())),
                ("temp", PLACEHOLDER_TEMPERATURE.to_string()),
            ],
            _ => Vec::new(),
        };
        Some(bindings)
    }

    fn render(&self, variants: &[&str], bindings: &[(&'static str, String)]) -> String {
        let template = variants[self.picker.pick(variants.len()) % variants.len()];
        expand(template, bindings)
    }
}

/// Single-pass `{name}` substitution; bound values are never re-expanded
fn expand(template: &str, bindings: &[(&'static str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let value = tail.find('}').and_then(|end| {
            let name = &tail[1..end];
            bindings
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (value, end))
        });

        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
