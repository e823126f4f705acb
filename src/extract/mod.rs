//! Ordered recognizer chains over assistant text
//!
//! Every extractor in this module is a [`RuleChain`]: a list of recognizers
//! tried most-specific first. The first recognizer that yields anything wins
//! and the rest are skipped, so a loose fallback can never fire on text that
//! already matched a stricter dialect.

pub mod comparison;
pub mod flights;
pub mod itinerary;
pub mod links;

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;
use tracing::debug;

pub use comparison::parse_price_comparison;
pub use flights::parse_flight_options;
pub use itinerary::parse_itinerary;
pub use links::{action_link_rules, extract_action_links};

/// One typed value recognized at a byte span of the input
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<T> {
    pub span: Range<usize>,
    pub value: T,
}

impl<T> RuleMatch<T> {
    pub fn new(span: Range<usize>, value: T) -> Self {
        Self { span, value }
    }
}

/// Recognizer function: pure, returns matches in text order
pub type Recognizer<T> = fn(&str) -> Vec<RuleMatch<T>>;

/// A named recognizer tier
#[derive(Clone)]
pub struct Rule<T> {
    name: &'static str,
    recognize: Recognizer<T>,
}

impl<T> Rule<T> {
    pub fn new(name: &'static str, recognize: Recognizer<T>) -> Self {
        Self { name, recognize }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run this tier alone
    pub fn recognize(&self, text: &str) -> Vec<RuleMatch<T>> {
        (self.recognize)(text)
    }
}

impl<T> std::fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Result of running a chain over one text
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    /// Name of the tier that fired, if any
    pub tier: Option<&'static str>,
    pub items: Vec<T>,
    /// Input with every accepted match span removed
    pub residual: String,
}

/// Ordered list of rules with first-hit short-circuit
#[derive(Debug, Clone)]
pub struct RuleChain<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleChain<T> {
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    /// Apply rules in order; the first tier with matches consumes them and
    /// later tiers are not attempted.
    pub fn apply(&self, text: &str) -> Extraction<T> {
        for rule in &self.rules {
            let matches = rule.recognize(text);
            if matches.is_empty() {
                continue;
            }

            let accepted = drop_overlapping(matches);
            debug!(
                target: "travel_extract::extract",
                tier = rule.name,
                matches = accepted.len(),
                "recognizer tier fired"
            );

            let spans: Vec<Range<usize>> = accepted.iter().map(|m| m.span.clone()).collect();
            return Extraction {
                tier: Some(rule.name),
                items: accepted.into_iter().map(|m| m.value).collect(),
                residual: excise_spans(text, &spans),
            };
        }

        Extraction {
            tier: None,
            items: Vec::new(),
            residual: text.to_string(),
        }
    }
}

// Matches are ordered by start; a match starting inside an accepted span is dropped.
fn drop_overlapping<T>(mut matches: Vec<RuleMatch<T>>) -> Vec<RuleMatch<T>> {
    matches.sort_by_key(|m| m.span.start);
    let mut accepted: Vec<RuleMatch<T>> = Vec::with_capacity(matches.len());
    let mut last_end = 0;
    for candidate in matches {
        if !accepted.is_empty() && candidate.span.start < last_end {
            continue;
        }
        last_end = candidate.span.end;
        accepted.push(candidate);
    }
    accepted
}

/// Remove byte spans from `text` and tidy the whitespace left behind.
///
/// Spans must be sorted, non-overlapping and on char boundaries.
pub fn excise_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor || span.end > text.len() || span.start > span.end {
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    tidy_whitespace(&out)
}

fn tidy_whitespace(text: &str) -> String {
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    let blank_runs = cached_regex(&BLANK_RUNS, r"\n[ \t]*(?:\n[ \t]*)+\n");

    let trimmed_lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = trimmed_lines.join("\n");
    blank_runs.replace_all(&joined, "\n\n").trim().to_string()
}

pub(crate) fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern must compile"))
}

/// Normalise line endings so recognizers only have to handle `\n`.
pub(crate) fn normalize_newlines(text: &str) -> std::borrow::Cow<'_, str> {
    if text.contains('\r') {
        std::borrow::Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        std::borrow::Cow::Borrowed(text)
    }
}
