//! Interest and expertise scorers

use crate::analysis::collector::UserAnalysisData;
use crate::lexicon::{self, TOPICS};
use crate::types::{InterestProfile, TechnicalLevel};

/// Minimum topic hits before a topic counts as a primary interest
const MIN_TOPIC_HITS: usize = 3;

/// Hit count marking a topic as a candidate expertise area
const EXPERTISE_TOPIC_HITS: usize = 12;

/// Maximum primary interests reported
const MAX_PRIMARY_INTERESTS: usize = 3;

/// Derive technical level, primary interests, and expertise areas
pub fn score_interests(data: &UserAnalysisData) -> InterestProfile {
    let messages = &data.messages;

    let technical_level = match lexicon::distinct_technical_indicators(messages) {
        0 => TechnicalLevel::Novice,
        1 => TechnicalLevel::Intermediate,
        2 => TechnicalLevel::Advanced,
        _ => TechnicalLevel::Expert,
    };

    let mut topic_hits: Vec<(&str, usize)> = TOPICS
        .iter()
        .map(|(name, re)| {
            let hits = messages
                .iter()
                .map(|m| re.find_iter(&m.content).count())
                .sum::<usize>();
            (*name, hits)
        })
        .filter(|(_, hits)| *hits >= MIN_TOPIC_HITS)
        .collect();
    topic_hits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let primary_interests: Vec<String> = topic_hits
        .iter()
        .take(MAX_PRIMARY_INTERESTS)
        .map(|(name, _)| name.to_string())
        .collect();

    // Expertise requires both saturation of a topic and demonstrated
    // technical depth
    let expertise_areas: Vec<String> = if technical_level >= TechnicalLevel::Advanced {
        topic_hits
            .iter()
            .filter(|(_, hits)| *hits >= EXPERTISE_TOPIC_HITS)
            .map(|(name, _)| name.to_string())
            .collect()
    } else {
        Vec::new()
    };

    InterestProfile {
        technical_level,
        primary_interests,
        expertise_areas,
    }
}
