//! Classifier heuristics: attachment style and emotional bond stage
//!
//! Both classifiers are explicit ordered rule tables evaluated
//! first-match-wins, so precedence stays auditable and testable in
//! isolation. These are decision tables, not learned models; the
//! thresholds and their ordering ARE the behavior.

use crate::analysis::collector::UserAnalysisData;
use crate::lexicon::{self, LexiconCategory};
use crate::types::{AttachmentAssessment, AttachmentStyle, BondStage};

/// Deterministic measures feeding the attachment cascade
#[derive(Debug, Clone, Copy)]
pub struct AttachmentSignals {
    /// 1 − normalized variance of inter-message gaps, in [0, 1]
    pub interval_consistency: f64,

    /// Vulnerability-lexicon hits per message
    pub vulnerability_density: f64,

    /// Messages per active day over the window
    pub daily_rate: f64,
}

impl AttachmentSignals {
    /// Measure the attachment signals over one analysis window
    pub fn from_data(data: &UserAnalysisData) -> Self {
        let messages = &data.messages;

        let gaps: Vec<f64> = messages
            .windows(2)
            .map(|pair| (pair[0].timestamp - pair[1].timestamp).num_seconds() as f64)
            .collect();
        let interval_consistency = if gaps.len() < 2 {
            0.5
        } else {
            let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
            if mean <= 0.0 {
                0.5
            } else {
                let variance =
                    gaps.iter().map(|g| (g - mean) * (g - mean)).sum::<f64>() / gaps.len() as f64;
                // Squared coefficient of variation, clamped to [0, 1]
                (1.0 - (variance / (mean * mean)).min(1.0)).max(0.0)
            }
        };

        let vulnerability_density = lexicon::density(LexiconCategory::Vulnerability, messages);
        let daily_rate = messages.len() as f64 / data.window_days() as f64;

        Self {
            interval_consistency,
            vulnerability_density,
            daily_rate,
        }
    }
}

// Attachment cascade thresholds
const SECURE_CONSISTENCY: f64 = 0.5;
const SECURE_VULNERABILITY: f64 = 0.02;
const ANXIOUS_VULNERABILITY: f64 = 0.10;
const ANXIOUS_DAILY_RATE: f64 = 6.0;
const AVOIDANT_VULNERABILITY: f64 = 0.02;

/// Ordered cascade: secure → anxious → avoidant → disorganized
///
/// Each rule carries a fixed confidence; the first matching rule wins.
const ATTACHMENT_RULES: &[(fn(&AttachmentSignals) -> bool, AttachmentStyle, f32)] = &[
    (
        |s| s.interval_consistency >= SECURE_CONSISTENCY
            && s.vulnerability_density >= SECURE_VULNERABILITY,
        AttachmentStyle::Secure,
        0.8,
    ),
    (
        |s| s.vulnerability_density >= ANXIOUS_VULNERABILITY && s.daily_rate >= ANXIOUS_DAILY_RATE,
        AttachmentStyle::Anxious,
        0.7,
    ),
    (
        |s| s.vulnerability_density < AVOIDANT_VULNERABILITY,
        AttachmentStyle::Avoidant,
        0.65,
    ),
];

/// Terminal rule when nothing above matches
const ATTACHMENT_FALLBACK: (AttachmentStyle, f32) = (AttachmentStyle::Disorganized, 0.4);

/// Classify attachment style from interaction timing and vulnerability
pub fn classify_attachment(data: &UserAnalysisData) -> AttachmentAssessment {
    let signals = AttachmentSignals::from_data(data);
    classify_attachment_signals(&signals)
}

/// The cascade itself, split out so precedence is testable in isolation
pub fn classify_attachment_signals(signals: &AttachmentSignals) -> AttachmentAssessment {
    for (predicate, style, confidence) in ATTACHMENT_RULES {
        if predicate(signals) {
            return AttachmentAssessment {
                style: *style,
                confidence: *confidence,
            };
        }
    }
    AttachmentAssessment {
        style: ATTACHMENT_FALLBACK.0,
        confidence: ATTACHMENT_FALLBACK.1,
    }
}

/// Inputs to the emotional-bond decision table
#[derive(Debug, Clone, Copy)]
pub struct BondSignals {
    pub trust_level: u8,
    pub affinity_score: i8,
    pub message_count: u64,
    pub days_since_first_contact: i64,
}

/// Ordered bond-stage table, first-match-wins
///
/// Ranges overlap deliberately; reordering the rows changes the output.
/// Nemesis outranks everything, then the stranger floor, then the
/// closeness tiers from strongest to weakest.
const BOND_RULES: &[(fn(&BondSignals) -> bool, BondStage)] = &[
    (
        |s| s.trust_level < 30 && s.affinity_score < -50,
        BondStage::Nemesis,
    ),
    (|s| s.message_count < 10, BondStage::Stranger),
    (
        |s| {
            s.trust_level >= 75
                && s.affinity_score >= 70
                && s.message_count >= 100
                && s.days_since_first_contact >= 14
        },
        BondStage::CloseFriend,
    ),
    (
        |s| s.trust_level >= 70 && s.affinity_score >= 60 && s.message_count >= 50,
        BondStage::Ally,
    ),
    (
        |s| s.trust_level >= 60 && s.affinity_score >= 40 && s.message_count >= 30,
        BondStage::Friend,
    ),
    (
        |s| s.message_count >= 30 && s.days_since_first_contact >= 7,
        BondStage::Regular,
    ),
];

/// Classify the emotional bond stage; acquaintance is the default
pub fn classify_bond_stage(signals: &BondSignals) -> BondStage {
    for (predicate, stage) in BOND_RULES {
        if predicate(signals) {
            return *stage;
        }
    }
    BondStage::Acquaintance
}
