//! Deterministic scorers over collected analysis data
//!
//! Every scorer is a pure synchronous function of `UserAnalysisData`; none
//! touch the network or the store. Numeric scores follow the shared form
//! `baseline (50) + Σ capped signals`, clamped to their declared range, so
//! no single signal can saturate a score on its own. Given identical input
//! data, every function here is bit-for-bit reproducible.

pub mod behavior;
pub mod cognition;
pub mod interests;
pub mod personality;
pub mod temporal;

use crate::types::MessageSample;

/// Neutral midpoint every additive score starts from
pub(crate) const BASELINE: f64 = 50.0;

/// Clamp an accumulated score into [0, 100] as an integer
pub(crate) fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Cap one signal's contribution before summation
pub(crate) fn capped(value: f64, cap: f64) -> f64 {
    value.min(cap)
}

/// Fraction of messages satisfying a predicate (0.0 for an empty window)
pub(crate) fn message_fraction<F>(messages: &[MessageSample], predicate: F) -> f64
where
    F: Fn(&MessageSample) -> bool,
{
    if messages.is_empty() {
        return 0.0;
    }
    messages.iter().filter(|m| predicate(m)).count() as f64 / messages.len() as f64
}

/// Mean message length in characters (0.0 for an empty window)
pub(crate) fn mean_length(messages: &[MessageSample]) -> f64 {
    if messages.is_empty() {
        return 0.0;
    }
    let total: usize = messages.iter().map(|m| m.content.chars().count()).sum();
    total as f64 / messages.len() as f64
}

/// Lowercased whitespace-split tokens with surrounding punctuation stripped
pub(crate) fn tokens<'a, I>(messages: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a MessageSample>,
{
    messages
        .into_iter()
        .flat_map(|m| m.content.split_whitespace())
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Type/token ratio over a token list (0.0 when empty)
pub(crate) fn type_token_ratio(words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let distinct: std::collections::HashSet<&str> = words.iter().map(String::as_str).collect();
    distinct.len() as f64 / words.len() as f64
}
