//! Cognitive-style and social-dynamics scorers

use super::{capped, clamp_score, BASELINE};
use crate::analysis::collector::UserAnalysisData;
use crate::lexicon::{self, LexiconCategory};
use crate::types::{CognitiveStyleScores, ConflictStyle, HumorStyle, SocialDynamics};

/// Shared multiplier for the four disjoint cognitive lexicons
const COGNITIVE_WEIGHT: f64 = 35.0;
const COGNITIVE_CAP: f64 = 40.0;

/// Score analytical, creative, abstract, and concrete thinking styles
pub fn score_cognitive_style(data: &UserAnalysisData) -> CognitiveStyleScores {
    let messages = &data.messages;
    let style = |category: LexiconCategory| {
        clamp_score(BASELINE + capped(lexicon::density(category, messages) * COGNITIVE_WEIGHT, COGNITIVE_CAP))
    };

    CognitiveStyleScores {
        analytical: style(LexiconCategory::Analytical),
        creative: style(LexiconCategory::Creative),
        abstract_thinking: style(LexiconCategory::AbstractThinking),
        concrete_thinking: style(LexiconCategory::ConcreteThinking),
    }
}

// Social dominance: directive sentence starts
const DOMINANCE_WEIGHT: f64 = 60.0;
const DOMINANCE_CAP: f64 = 35.0;

// Cooperation: first-person-plural / collaboration vocabulary
const COOPERATION_WEIGHT: f64 = 25.0;
const COOPERATION_CAP: f64 = 35.0;

/// Score dominance/cooperation and pick conflict and humor styles
pub fn score_social_dynamics(data: &UserAnalysisData) -> SocialDynamics {
    let messages = &data.messages;

    let dominance = BASELINE
        + capped(
            lexicon::density(LexiconCategory::ImperativeStarts, messages) * DOMINANCE_WEIGHT,
            DOMINANCE_CAP,
        );
    let cooperation = BASELINE
        + capped(
            lexicon::density(LexiconCategory::Collaboration, messages) * COOPERATION_WEIGHT,
            COOPERATION_CAP,
        );

    SocialDynamics {
        dominance: clamp_score(dominance),
        cooperation: clamp_score(cooperation),
        conflict_style: conflict_style(data),
        humor_style: humor_style(data),
    }
}

/// Presence ordering: aggressive > compromise > avoidance markers, with
/// collaborating as the default when none appear
fn conflict_style(data: &UserAnalysisData) -> ConflictStyle {
    let messages = &data.messages;
    if lexicon::total_hits(LexiconCategory::AggressiveConflict, messages) > 0 {
        ConflictStyle::Competing
    } else if lexicon::total_hits(LexiconCategory::CompromiseConflict, messages) > 0 {
        ConflictStyle::Compromising
    } else if lexicon::total_hits(LexiconCategory::AvoidanceConflict, messages) > 0 {
        ConflictStyle::Avoiding
    } else {
        ConflictStyle::Collaborating
    }
}

/// Self-deprecating vs affiliative humor counts; minimal when both are zero
fn humor_style(data: &UserAnalysisData) -> HumorStyle {
    let messages = &data.messages;
    let self_deprecating = lexicon::total_hits(LexiconCategory::SelfDeprecatingHumor, messages);
    let affiliative = lexicon::total_hits(LexiconCategory::AffiliativeHumor, messages);

    if self_deprecating == 0 && affiliative == 0 {
        HumorStyle::Minimal
    } else if self_deprecating > affiliative {
        HumorStyle::SelfDeprecating
    } else {
        HumorStyle::Affiliative
    }
}
