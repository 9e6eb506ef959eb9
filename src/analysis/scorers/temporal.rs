//! Temporal activity and trend scorers
//!
//! Peak hours, weekend activity, relationship trajectory, vocabulary
//! growth, and engagement authenticity. Trend scorers compare the older
//! half of the window against the newer half; the window itself arrives
//! newest-first and is reversed here.

use super::{clamp_score, type_token_ratio};
use crate::analysis::collector::UserAnalysisData;
use crate::lexicon::{self, EMOJI_RE};
use crate::types::{MessageSample, RelationshipTrajectory, TemporalPatterns};
use chrono::{Datelike, Timelike, Weekday};

/// How many peak hours to report
const PEAK_HOURS: usize = 3;

/// Sentiment drift beyond which the trajectory is no longer stable
const TRAJECTORY_THRESHOLD: f32 = 0.15;

/// Minimum annotated messages before a trajectory is computed
const MIN_TRAJECTORY_SAMPLES: usize = 6;

/// Messages shorter than this are low-effort
const LOW_EFFORT_LENGTH: usize = 5;

/// Top activity hours and weekend ratio over the window
pub fn score_temporal_patterns(data: &UserAnalysisData) -> TemporalPatterns {
    let messages = &data.messages;

    let mut histogram = [0usize; 24];
    for message in messages {
        histogram[message.timestamp.hour() as usize] += 1;
    }
    let mut ranked: Vec<(u32, usize)> = histogram
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(hour, count)| (hour as u32, *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let peak_hours = ranked.into_iter().take(PEAK_HOURS).map(|(h, _)| h).collect();

    let weekend = messages
        .iter()
        .filter(|m| {
            matches!(m.timestamp.weekday(), Weekday::Sat | Weekday::Sun)
        })
        .count();
    let weekend_ratio = if messages.is_empty() {
        0.0
    } else {
        weekend as f64 / messages.len() as f64
    };

    TemporalPatterns {
        peak_hours,
        weekend_ratio,
    }
}

/// Sentiment drift between the older and newer halves of the window
pub fn score_relationship_trajectory(data: &UserAnalysisData) -> RelationshipTrajectory {
    // Chronological order: the window arrives newest-first
    let scores: Vec<f32> = data
        .messages
        .iter()
        .rev()
        .filter_map(|m| m.sentiment.as_ref())
        .map(|a| a.score)
        .collect();

    if scores.len() < MIN_TRAJECTORY_SAMPLES {
        return RelationshipTrajectory::InsufficientData;
    }

    let mid = scores.len() / 2;
    let older_mean = mean(&scores[..mid]);
    let newer_mean = mean(&scores[mid..]);
    let drift = newer_mean - older_mean;

    if drift > TRAJECTORY_THRESHOLD {
        RelationshipTrajectory::Improving
    } else if drift < -TRAJECTORY_THRESHOLD {
        RelationshipTrajectory::Declining
    } else {
        RelationshipTrajectory::Stable
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Relative change in type/token ratio between window halves
///
/// Positive values mean the newer half shows a richer vocabulary.
pub fn score_vocabulary_growth(data: &UserAnalysisData) -> f64 {
    let chronological: Vec<&MessageSample> = data.messages.iter().rev().collect();
    if chronological.len() < 2 {
        return 0.0;
    }

    let mid = chronological.len() / 2;
    let ratio_of = |half: &[&MessageSample]| {
        type_token_ratio(&super::tokens(half.iter().copied()))
    };
    let older = ratio_of(&chronological[..mid]);
    let newer = ratio_of(&chronological[mid..]);

    if older == 0.0 {
        0.0
    } else {
        (newer - older) / older
    }
}

/// Fraction of messages that are not low-effort, scaled to 0-100
///
/// Low-effort: shorter than five characters, an exact filler-token match,
/// or purely emoji/whitespace.
pub fn score_engagement_authenticity(data: &UserAnalysisData) -> u8 {
    if data.messages.is_empty() {
        return 0;
    }
    let substantive = data
        .messages
        .iter()
        .filter(|m| !is_low_effort(&m.content))
        .count() as f64;
    clamp_score(substantive / data.messages.len() as f64 * 100.0)
}

fn is_low_effort(content: &str) -> bool {
    let trimmed = content.trim();
    if trimmed.chars().count() < LOW_EFFORT_LENGTH {
        return true;
    }
    if lexicon::is_filler(trimmed) {
        return true;
    }
    // Purely emoji/whitespace
    EMOJI_RE.replace_all(trimmed, "").trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scorers::test_support::{annotated_msg, data_from, msg};
    use crate::types::SentimentLabel;

    #[test]
    fn test_peak_hours_top_three() {
        let mut messages = Vec::new();
        // Hour distribution depends on current time; just check the shape
        for i in 0..10 {
            messages.push(msg("evening chat", i * 3));
        }
        let patterns = score_temporal_patterns(&data_from(messages));
        assert!(patterns.peak_hours.len() <= 3);
        assert!(patterns.peak_hours.iter().all(|h| *h < 24));
        assert!((0.0..=1.0).contains(&patterns.weekend_ratio));
    }

    #[test]
    fn test_trajectory_insufficient_data() {
        let data = data_from(vec![
            annotated_msg("fine", 0, SentimentLabel::Neutral, 0.0),
            annotated_msg("fine", 1, SentimentLabel::Neutral, 0.0),
        ]);
        assert_eq!(
            score_relationship_trajectory(&data),
            RelationshipTrajectory::InsufficientData
        );
    }

    #[test]
    fn test_trajectory_improving() {
        // Newest-first: recent messages positive, older ones negative
        let data = data_from(vec![
            annotated_msg("love this", 0, SentimentLabel::Positive, 0.8),
            annotated_msg("great stuff", 10, SentimentLabel::Positive, 0.7),
            annotated_msg("pretty good", 20, SentimentLabel::Positive, 0.6),
            annotated_msg("meh", 30, SentimentLabel::Negative, -0.3),
            annotated_msg("not great", 40, SentimentLabel::Negative, -0.4),
            annotated_msg("ugh", 50, SentimentLabel::Negative, -0.5),
        ]);
        assert_eq!(
            score_relationship_trajectory(&data),
            RelationshipTrajectory::Improving
        );
    }

    #[test]
    fn test_trajectory_declining_and_stable() {
        let declining = data_from(vec![
            annotated_msg("ugh", 0, SentimentLabel::Negative, -0.5),
            annotated_msg("not great", 10, SentimentLabel::Negative, -0.4),
            annotated_msg("meh", 20, SentimentLabel::Negative, -0.3),
            annotated_msg("pretty good", 30, SentimentLabel::Positive, 0.6),
            annotated_msg("great stuff", 40, SentimentLabel::Positive, 0.7),
            annotated_msg("love this", 50, SentimentLabel::Positive, 0.8),
        ]);
        assert_eq!(
            score_relationship_trajectory(&declining),
            RelationshipTrajectory::Declining
        );

        let stable = data_from(
            (0..6)
                .map(|i| annotated_msg("fine", i * 10, SentimentLabel::Neutral, 0.1))
                .collect(),
        );
        assert_eq!(
            score_relationship_trajectory(&stable),
            RelationshipTrajectory::Stable
        );
    }

    #[test]
    fn test_vocabulary_growth_direction() {
        // Older half repetitive, newer half varied
        let data = data_from(vec![
            msg("entirely different words appear now", 0),
            msg("fresh vocabulary arrives here today", 10),
            msg("same same same same same", 20),
            msg("same same same same same", 30),
        ]);
        assert!(score_vocabulary_growth(&data) > 0.0);

        let flat = data_from(vec![msg("hello world", 0)]);
        assert_eq!(score_vocabulary_growth(&flat), 0.0);
    }

    #[test]
    fn test_authenticity_filters_low_effort() {
        let data = data_from(vec![
            msg("a real contribution to the discussion", 0),
            msg("lol", 1),
            msg("🎉🎉", 2),
            msg("ok", 3),
        ]);
        assert_eq!(score_engagement_authenticity(&data), 25);

        let empty = data_from(vec![]);
        assert_eq!(score_engagement_authenticity(&empty), 0);
    }

    #[test]
    fn test_filler_is_low_effort_even_when_long() {
        assert!(is_low_effort("  okay  "));
        assert!(!is_low_effort("okay but hear me out"));
    }
}
