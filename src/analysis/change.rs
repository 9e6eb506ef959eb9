//! Change detection between consecutive feelings snapshots
//!
//! Produces the human-readable summary stored verbatim on each history
//! entry. Summaries are never recomputed retroactively.

use crate::types::UserFeelings;

/// Absolute delta below which trust/affinity movement is not reported
const SIGNIFICANT_DELTA: i32 = 10;

/// Summarize how the new snapshot differs from the previous one
///
/// Reports, in order: the trust delta, the affinity delta, and a
/// sentiment-category change. With no prior snapshot the summary is
/// "Initial analysis"; with no significant movement it is
/// "No significant changes".
pub fn summarize_change(previous: Option<&UserFeelings>, current: &UserFeelings) -> String {
    let Some(previous) = previous else {
        return "Initial analysis".to_string();
    };

    let mut parts = Vec::new();

    let trust_delta = current.trust_level as i32 - previous.trust_level as i32;
    if trust_delta.abs() >= SIGNIFICANT_DELTA {
        let direction = if trust_delta > 0 { "increased" } else { "decreased" };
        parts.push(format!("Trust {} by {}", direction, trust_delta.abs()));
    }

    let affinity_delta = current.affinity_score as i32 - previous.affinity_score as i32;
    if affinity_delta.abs() >= SIGNIFICANT_DELTA {
        let direction = if affinity_delta > 0 { "increased" } else { "decreased" };
        parts.push(format!("Affinity {} by {}", direction, affinity_delta.abs()));
    }

    if current.sentiment != previous.sentiment {
        parts.push(format!(
            "Sentiment shifted from {} to {}",
            previous.sentiment, current.sentiment
        ));
    }

    if parts.is_empty() {
        "No significant changes".to_string()
    } else {
        parts.join("; ")
    }
}
