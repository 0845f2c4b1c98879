//! JSON recovery from free-form model replies
//!
//! Generative models wrap JSON inconsistently: sometimes bare, sometimes inside
//! a Markdown code fence, sometimes surrounded by prose. Recovery tries a fixed
//! list of strategies in order and stops at the first one that parses.
//!
//! **Order:**
//! 1. [`ExtractStrategy::Direct`] - the whole trimmed reply
//! 2. [`ExtractStrategy::FencedBlock`] - a `{...}` object inside a code fence
//! 3. [`ExtractStrategy::BraceSpan`] - first `{` through last `}`
//!
//! A miss is never an error; callers receive [`Extraction::NotFound`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Code fence, optional language tag, then the shortest `{...}` that is
/// followed by optional whitespace and the closing fence.
static FENCED_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+\-]*\s*(\{.*?\})\s*```").expect("fence pattern is valid")
});

/// One way of locating JSON inside a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStrategy {
    Direct,
    FencedBlock,
    BraceSpan,
}

impl ExtractStrategy {
    /// Strategies in the order they are attempted
    pub const ORDER: [ExtractStrategy; 3] = [
        ExtractStrategy::Direct,
        ExtractStrategy::FencedBlock,
        ExtractStrategy::BraceSpan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExtractStrategy::Direct => "direct",
            ExtractStrategy::FencedBlock => "fenced_block",
            ExtractStrategy::BraceSpan => "brace_span",
        }
    }

    /// Run this strategy alone
    pub fn apply(self, text: &str) -> Option<Value> {
        match self {
            ExtractStrategy::Direct => parse_direct(text),
            ExtractStrategy::FencedBlock => parse_fenced_block(text),
            ExtractStrategy::BraceSpan => parse_brace_span(text),
        }
    }
}

/// Result of [`extract_json`]
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found {
        value: Value,
        strategy: ExtractStrategy,
    },
    NotFound,
}

impl Extraction {
    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found { .. })
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Extraction::Found { value, .. } => Some(value),
            Extraction::NotFound => None,
        }
    }
}

/// Recover a JSON value from raw model text
///
/// # Examples
///
/// ```
/// use alignpath_common::normalize::{extract_json, ExtractStrategy, Extraction};
/// use serde_json::json;
///
/// let found = extract_json("Sure! ```json\n{\"a\":1}\n```");
/// assert_eq!(
///     found,
///     Extraction::Found { value: json!({"a": 1}), strategy: ExtractStrategy::FencedBlock }
/// );
///
/// assert_eq!(extract_json("no structured data here"), Extraction::NotFound);
/// ```
pub fn extract_json(text: &str) -> Extraction {
    for strategy in ExtractStrategy::ORDER {
        if let Some(value) = strategy.apply(text) {
            debug!(strategy = strategy.name(), "Recovered JSON from model reply");
            return Extraction::Found { value, strategy };
        }
        debug!(strategy = strategy.name(), "Extraction strategy missed");
    }
    Extraction::NotFound
}

fn parse_direct(text: &str) -> Option<Value> {
    serde_json::from_str(text.trim()).ok()
}

fn parse_fenced_block(text: &str) -> Option<Value> {
    let captured = FENCED_OBJECT.captures(text)?.get(1)?;
    serde_json::from_str(captured.as_str()).ok()
}

fn parse_brace_span(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}
