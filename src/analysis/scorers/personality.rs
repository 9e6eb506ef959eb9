//! Big Five and emotional-intelligence proxy scorers
//!
//! Heuristic proxies over lexicon densities and sentiment ratios, not
//! validated psychometric instruments. Each signal's contribution is
//! capped before summation.

use super::{capped, clamp_score, mean_length, message_fraction, BASELINE};
use crate::analysis::collector::UserAnalysisData;
use crate::lexicon::{self, LexiconCategory};
use crate::types::{BigFiveScores, EmotionalIntelligenceScores};

// Openness: conceptual/curiosity vocabulary plus question-form phrasing
const OPENNESS_CONCEPT_WEIGHT: f64 = 30.0;
const OPENNESS_CONCEPT_CAP: f64 = 25.0;
const OPENNESS_QUESTION_WEIGHT: f64 = 30.0;
const OPENNESS_QUESTION_CAP: f64 = 15.0;

// Conscientiousness: precision/structure vocabulary
const PRECISION_WEIGHT: f64 = 35.0;
const PRECISION_CAP: f64 = 30.0;

// Extraversion: mean message length plus exclamation density
const LENGTH_DIVISOR: f64 = 12.0;
const LENGTH_CAP: f64 = 20.0;
const EXCLAMATION_WEIGHT: f64 = 15.0;
const EXCLAMATION_CAP: f64 = 20.0;

// Agreeableness: positive-sentiment ratio plus warmth vocabulary
const POSITIVE_RATIO_WEIGHT: f64 = 40.0;
const POSITIVE_RATIO_CAP: f64 = 25.0;
const WARMTH_WEIGHT: f64 = 30.0;
const WARMTH_CAP: f64 = 20.0;

// Neuroticism: negative-sentiment ratio plus anxiety vocabulary
const NEGATIVE_RATIO_WEIGHT: f64 = 40.0;
const NEGATIVE_RATIO_CAP: f64 = 25.0;
const ANXIETY_WEIGHT: f64 = 30.0;
const ANXIETY_CAP: f64 = 20.0;

/// Score all five OCEAN traits for one analysis window
pub fn score_big_five(data: &UserAnalysisData) -> BigFiveScores {
    let messages = &data.messages;
    let patterns = &data.patterns;

    let question_ratio = message_fraction(messages, |m| m.content.contains('?'));
    let openness = BASELINE
        + capped(
            lexicon::density(LexiconCategory::ConceptualCuriosity, messages)
                * OPENNESS_CONCEPT_WEIGHT,
            OPENNESS_CONCEPT_CAP,
        )
        + capped(question_ratio * OPENNESS_QUESTION_WEIGHT, OPENNESS_QUESTION_CAP);

    let conscientiousness = BASELINE
        + capped(
            lexicon::density(LexiconCategory::PrecisionStructure, messages) * PRECISION_WEIGHT,
            PRECISION_CAP,
        );

    let exclamation_density = if messages.is_empty() {
        0.0
    } else {
        messages
            .iter()
            .map(|m| m.content.matches('!').count())
            .sum::<usize>() as f64
            / messages.len() as f64
    };
    let extraversion = BASELINE
        + capped(mean_length(messages) / LENGTH_DIVISOR, LENGTH_CAP)
        + capped(exclamation_density * EXCLAMATION_WEIGHT, EXCLAMATION_CAP);

    let agreeableness = BASELINE
        + capped(patterns.positive_ratio() * POSITIVE_RATIO_WEIGHT, POSITIVE_RATIO_CAP)
        + capped(
            lexicon::density(LexiconCategory::Warmth, messages) * WARMTH_WEIGHT,
            WARMTH_CAP,
        );

    let neuroticism = BASELINE
        + capped(patterns.negative_ratio() * NEGATIVE_RATIO_WEIGHT, NEGATIVE_RATIO_CAP)
        + capped(
            lexicon::density(LexiconCategory::Anxiety, messages) * ANXIETY_WEIGHT,
            ANXIETY_CAP,
        );

    BigFiveScores {
        openness: clamp_score(openness),
        conscientiousness: clamp_score(conscientiousness),
        extraversion: clamp_score(extraversion),
        agreeableness: clamp_score(agreeableness),
        neuroticism: clamp_score(neuroticism),
    }
}

// Emotional intelligence signal weights
const AWARENESS_WEIGHT: f64 = 35.0;
const AWARENESS_CAP: f64 = 30.0;
const EMPATHY_WEIGHT: f64 = 40.0;
const EMPATHY_CAP: f64 = 35.0;
const EXTREME_NEGATIVE_PENALTY: f64 = 60.0;
const NEGATIVE_PENALTY: f64 = 25.0;
const REGULATION_FLOOR: f64 = 15.0;

/// Score awareness, empathy, and regulation proxies
pub fn score_emotional_intelligence(data: &UserAnalysisData) -> EmotionalIntelligenceScores {
    let messages = &data.messages;
    let patterns = &data.patterns;

    let awareness = BASELINE
        + capped(
            lexicon::density(LexiconCategory::EmotionWords, messages) * AWARENESS_WEIGHT,
            AWARENESS_CAP,
        );

    let empathy = BASELINE
        + capped(
            lexicon::density(LexiconCategory::EmpathyPhrases, messages) * EMPATHY_WEIGHT,
            EMPATHY_CAP,
        );

    let extreme_negative_ratio = if patterns.annotated_count == 0 {
        0.0
    } else {
        messages
            .iter()
            .filter_map(|m| m.sentiment.as_ref())
            .filter(|a| a.is_extreme_negative())
            .count() as f64
            / patterns.annotated_count as f64
    };
    let regulation = (100.0
        - extreme_negative_ratio * EXTREME_NEGATIVE_PENALTY
        - patterns.negative_ratio() * NEGATIVE_PENALTY)
        .max(REGULATION_FLOOR);

    EmotionalIntelligenceScores {
        awareness: clamp_score(awareness),
        empathy: clamp_score(empathy),
        regulation: clamp_score(regulation),
    }
}
