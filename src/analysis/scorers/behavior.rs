//! Behavioral metrics and communication-pattern scorers

use super::{clamp_score, mean_length, message_fraction, tokens, type_token_ratio};
use crate::analysis::collector::UserAnalysisData;
use crate::lexicon::{self, LexiconCategory, EMOJI_RE};
use crate::types::{
    Assertiveness, BehavioralMetrics, CapitalizationPattern, CommunicationPatterns,
    EngagementLevel, Formality,
};

/// Majority-class threshold for a capitalization habit
const CAPITALIZATION_THRESHOLD: f64 = 0.3;

/// Compute raw behavioral metrics over the fetched window
pub fn score_behavioral_metrics(data: &UserAnalysisData) -> BehavioralMetrics {
    let messages = &data.messages;
    let avg = mean_length(messages);

    let variance = if messages.is_empty() {
        0.0
    } else {
        messages
            .iter()
            .map(|m| {
                let diff = m.content.chars().count() as f64 - avg;
                diff * diff
            })
            .sum::<f64>()
            / messages.len() as f64
    };

    // Window is newest-first; gaps are between consecutive messages
    let gaps: Vec<f64> = messages
        .windows(2)
        .map(|pair| (pair[0].timestamp - pair[1].timestamp).num_seconds() as f64)
        .collect();
    let avg_response_gap_secs = if gaps.is_empty() {
        None
    } else {
        Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
    };

    let per_message = |count: usize| {
        if messages.is_empty() {
            0.0
        } else {
            count as f64 / messages.len() as f64
        }
    };
    let emoji_rate = per_message(
        messages
            .iter()
            .map(|m| EMOJI_RE.find_iter(&m.content).count())
            .sum(),
    );
    let punctuation_rate = per_message(
        messages
            .iter()
            .map(|m| m.content.matches(['!', '?', '.', ',', ';', ':']).count())
            .sum(),
    );

    BehavioralMetrics {
        avg_message_length: avg,
        message_length_variance: variance,
        avg_response_gap_secs,
        emoji_rate,
        punctuation_rate,
        capitalization: capitalization_pattern(data),
    }
}

/// Majority-class capitalization habit over messages containing letters
fn capitalization_pattern(data: &UserAnalysisData) -> CapitalizationPattern {
    let lettered: Vec<&str> = data
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .filter(|c| c.chars().any(|ch| ch.is_alphabetic()))
        .collect();
    if lettered.is_empty() {
        return CapitalizationPattern::Standard;
    }

    let total = lettered.len() as f64;
    let all_caps = lettered
        .iter()
        .filter(|c| c.chars().filter(|ch| ch.is_alphabetic()).all(|ch| ch.is_uppercase()))
        .count() as f64;
    let all_lower = lettered
        .iter()
        .filter(|c| c.chars().filter(|ch| ch.is_alphabetic()).all(|ch| ch.is_lowercase()))
        .count() as f64;

    if all_caps / total > CAPITALIZATION_THRESHOLD {
        CapitalizationPattern::AllCaps
    } else if all_lower / total > CAPITALIZATION_THRESHOLD {
        CapitalizationPattern::AllLower
    } else {
        CapitalizationPattern::Standard
    }
}

/// Dominance factor one register must have over the other to win
const FORMALITY_DOMINANCE: f64 = 1.5;

/// Imperative-over-hedge factor for the assertive label
const ASSERTIVE_DOMINANCE: f64 = 1.5;

/// Hedge-over-imperative inverse factor for the passive label
const PASSIVE_INVERSE_DOMINANCE: f64 = 2.0;

/// Mean-length thresholds for engagement depth
const ENGAGEMENT_HIGH_LENGTH: f64 = 150.0;
const ENGAGEMENT_MEDIUM_LENGTH: f64 = 50.0;

/// Scale factor turning a type/token ratio into a 0-100 fluency score
const FLUENCY_SCALE: f64 = 125.0;

/// Score formality, assertiveness, engagement, fluency, and questioning
pub fn score_communication_patterns(data: &UserAnalysisData) -> CommunicationPatterns {
    let messages = &data.messages;

    let formal = lexicon::total_hits(LexiconCategory::FormalRegister, messages) as f64;
    let casual = lexicon::total_hits(LexiconCategory::CasualRegister, messages) as f64;
    let formality = if formal > casual * FORMALITY_DOMINANCE {
        Formality::Formal
    } else if casual > formal * FORMALITY_DOMINANCE {
        Formality::Casual
    } else {
        Formality::Neutral
    };

    let imperatives = lexicon::total_hits(LexiconCategory::ImperativeStarts, messages) as f64;
    let hedges = lexicon::total_hits(LexiconCategory::Hedges, messages) as f64;
    let assertiveness = if imperatives > hedges * ASSERTIVE_DOMINANCE {
        Assertiveness::Assertive
    } else if hedges > imperatives * PASSIVE_INVERSE_DOMINANCE {
        Assertiveness::Passive
    } else {
        Assertiveness::Balanced
    };

    let avg = mean_length(messages);
    let engagement = if avg > ENGAGEMENT_HIGH_LENGTH {
        EngagementLevel::High
    } else if avg > ENGAGEMENT_MEDIUM_LENGTH {
        EngagementLevel::Medium
    } else {
        EngagementLevel::Low
    };

    let words = tokens(messages);
    let verbal_fluency = clamp_score(type_token_ratio(&words) * FLUENCY_SCALE);
    let question_frequency = message_fraction(messages, |m| m.content.contains('?'));

    CommunicationPatterns {
        formality,
        assertiveness,
        engagement,
        verbal_fluency,
        question_frequency,
    }
}
