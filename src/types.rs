//! Core data types for the Ethos profiling engine
//!
//! This module defines the fundamental data structures used throughout ethos:
//! message samples as read from the store, the derived interaction
//! aggregates, every scorer output group, and the durable profile and
//! history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    /// A human community member
    Human,

    /// The assistant itself
    Assistant,

    /// An automated tool or integration
    Tool,
}

/// Sentiment category attached to a message by an upstream annotator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Mixed => write!(f, "mixed"),
        }
    }
}

/// Register of a message or of a user's overall style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Formal,
    Casual,
    Neutral,
}

/// Per-message sentiment annotation, produced outside this engine
///
/// The engine never computes these; it only aggregates whatever the
/// ingestion pipeline attached. A score at or below -0.6 is treated as
/// extreme negative by the regulation scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentAnnotation {
    /// Categorical sentiment
    pub label: SentimentLabel,

    /// Signed intensity in [-1.0, 1.0]
    pub score: f32,

    /// Detected emotion labels (e.g. "joy", "frustration")
    pub emotions: Vec<String>,

    /// Detected conversational archetypes (e.g. "mentor", "jester")
    pub archetypes: Vec<String>,

    /// Register of this particular message, if the annotator judged it
    pub formality: Option<Formality>,
}

/// Score threshold at or below which an annotation counts as extreme negative
pub const EXTREME_NEGATIVE_CUTOFF: f32 = -0.6;

impl SentimentAnnotation {
    /// Whether this annotation counts as extreme negative
    pub fn is_extreme_negative(&self) -> bool {
        self.score <= EXTREME_NEGATIVE_CUTOFF
    }
}

/// One message as read from the Message Store
///
/// Immutable once stored; owned by the store. The engine only reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSample {
    /// Store-assigned message id
    pub id: String,

    /// When the message was sent
    pub timestamp: DateTime<Utc>,

    /// Who sent it
    pub sender_kind: SenderKind,

    /// Platform user id of the sender
    pub user_id: String,

    /// Display name of the sender
    pub username: String,

    /// Channel the message was posted in
    pub channel_id: String,

    /// Raw message text
    pub content: String,

    /// Sentiment annotation, when the ingestion pipeline attached one
    pub sentiment: Option<SentimentAnnotation>,
}

/// Derived, transient aggregate over a set of sentiment annotations
///
/// Recomputed on every analysis run and never persisted standalone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionPatterns {
    /// Count of positively annotated messages
    pub positive: usize,

    /// Count of negatively annotated messages
    pub negative: usize,

    /// Count of neutrally annotated messages
    pub neutral: usize,

    /// Count of mixed-sentiment messages
    pub mixed: usize,

    /// Total messages carrying an annotation
    pub annotated_count: usize,

    /// Mean sentiment score across annotated messages
    pub mean_score: f32,

    /// Most frequent emotion labels, at most three
    pub dominant_emotions: Vec<String>,

    /// Most frequent archetype labels, at most three
    pub dominant_archetypes: Vec<String>,

    /// Modal register across annotated messages
    pub dominant_formality: Option<Formality>,
}

/// How many dominant emotion/archetype labels to keep
const TOP_LABELS: usize = 3;

impl InteractionPatterns {
    /// Aggregate the annotations found on a message window
    ///
    /// Messages without an annotation contribute nothing; an empty window
    /// yields the all-zero default.
    pub fn from_messages(messages: &[MessageSample]) -> Self {
        let mut patterns = InteractionPatterns::default();
        let mut score_sum = 0.0f32;
        let mut emotion_counts: HashMap<&str, usize> = HashMap::new();
        let mut archetype_counts: HashMap<&str, usize> = HashMap::new();
        let mut formality_counts: HashMap<Formality, usize> = HashMap::new();

        for annotation in messages.iter().filter_map(|m| m.sentiment.as_ref()) {
            match annotation.label {
                SentimentLabel::Positive => patterns.positive += 1,
                SentimentLabel::Negative => patterns.negative += 1,
                SentimentLabel::Neutral => patterns.neutral += 1,
                SentimentLabel::Mixed => patterns.mixed += 1,
            }
            patterns.annotated_count += 1;
            score_sum += annotation.score;

            for emotion in &annotation.emotions {
                *emotion_counts.entry(emotion.as_str()).or_default() += 1;
            }
            for archetype in &annotation.archetypes {
                *archetype_counts.entry(archetype.as_str()).or_default() += 1;
            }
            if let Some(formality) = annotation.formality {
                *formality_counts.entry(formality).or_default() += 1;
            }
        }

        if patterns.annotated_count > 0 {
            patterns.mean_score = score_sum / patterns.annotated_count as f32;
        }
        patterns.dominant_emotions = top_labels(emotion_counts, TOP_LABELS);
        patterns.dominant_archetypes = top_labels(archetype_counts, TOP_LABELS);
        patterns.dominant_formality = formality_counts
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(formality, _)| formality);

        patterns
    }

    /// Ratio of positive annotations among all annotated messages
    pub fn positive_ratio(&self) -> f64 {
        ratio(self.positive, self.annotated_count)
    }

    /// Ratio of negative annotations among all annotated messages
    pub fn negative_ratio(&self) -> f64 {
        ratio(self.negative, self.annotated_count)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Rank labels by count, breaking ties alphabetically for determinism
fn top_labels(counts: HashMap<&str, usize>, take: usize) -> Vec<String> {
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(take)
        .map(|(label, _)| label.to_string())
        .collect()
}

/// Subjective assessment of a user, produced once per analysis run
///
/// Supersedes the prior value on write; the prior value is the comparand
/// for the next run's change summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFeelings {
    /// Overall sentiment toward the user
    pub sentiment: SentimentLabel,

    /// Trust level, 0-100
    pub trust_level: u8,

    /// Affinity score, -100..=100
    pub affinity_score: i8,

    /// Short free-text impression
    pub thoughts: String,

    /// 1-5 short personality facet labels
    pub facets: Vec<String>,

    /// 0-5 short labels for notable interaction patterns
    pub notable_patterns: Vec<String>,

    /// When this assessment was produced
    pub last_updated: DateTime<Utc>,
}

impl UserFeelings {
    /// The fixed neutral fallback used whenever generation fails
    pub fn neutral_fallback(now: DateTime<Utc>) -> Self {
        Self {
            sentiment: SentimentLabel::Neutral,
            trust_level: 50,
            affinity_score: 0,
            thoughts: "Still getting to know them; need more interactions to form a clear impression.".to_string(),
            facets: Vec::new(),
            notable_patterns: Vec::new(),
            last_updated: now,
        }
    }
}

/// Categorical level for a Big Five trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitLevel {
    Low,
    Medium,
    High,
}

impl TraitLevel {
    /// Bucket a 0-100 score: >=70 high, >=40 medium, else low
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => TraitLevel::High,
            40..=69 => TraitLevel::Medium,
            _ => TraitLevel::Low,
        }
    }
}

/// Big Five (OCEAN) trait scores, each 0-100
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BigFiveScores {
    pub openness: u8,
    pub conscientiousness: u8,
    pub extraversion: u8,
    pub agreeableness: u8,
    pub neuroticism: u8,
}

/// Big Five traits bucketed into categorical levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BigFiveTraitLevels {
    pub openness: TraitLevel,
    pub conscientiousness: TraitLevel,
    pub extraversion: TraitLevel,
    pub agreeableness: TraitLevel,
    pub neuroticism: TraitLevel,
}

impl From<&BigFiveScores> for BigFiveTraitLevels {
    fn from(scores: &BigFiveScores) -> Self {
        Self {
            openness: TraitLevel::from_score(scores.openness),
            conscientiousness: TraitLevel::from_score(scores.conscientiousness),
            extraversion: TraitLevel::from_score(scores.extraversion),
            agreeableness: TraitLevel::from_score(scores.agreeableness),
            neuroticism: TraitLevel::from_score(scores.neuroticism),
        }
    }
}

/// Emotional intelligence proxy scores, each 0-100
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmotionalIntelligenceScores {
    /// Emotion-word density proxy for self/other awareness
    pub awareness: u8,

    /// Empathy-phrase density proxy
    pub empathy: u8,

    /// Inverse of negative-sentiment saturation
    pub regulation: u8,
}

/// Cognitive style scores, each 0-100
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CognitiveStyleScores {
    pub analytical: u8,
    pub creative: u8,
    pub abstract_thinking: u8,
    pub concrete_thinking: u8,
}

/// Conflict handling style (Thomas-Kilmann shorthand)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStyle {
    Competing,
    Compromising,
    Avoiding,
    Collaborating,
}

/// Dominant humor register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumorStyle {
    SelfDeprecating,
    Affiliative,
    Minimal,
}

/// Social dynamics signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialDynamics {
    /// Directive-sentence-start density, 0-100
    pub dominance: u8,

    /// First-person-plural / collaboration lexicon density, 0-100
    pub cooperation: u8,

    pub conflict_style: ConflictStyle,
    pub humor_style: HumorStyle,
}

/// Majority capitalization habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapitalizationPattern {
    AllCaps,
    AllLower,
    Standard,
}

/// Raw behavioral metrics over the fetched window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralMetrics {
    /// Mean message length in characters
    pub avg_message_length: f64,

    /// Population variance of message length
    pub message_length_variance: f64,

    /// Mean gap between consecutive messages in seconds (response latency
    /// proxy); absent with fewer than two messages
    pub avg_response_gap_secs: Option<f64>,

    /// Emoji occurrences per message
    pub emoji_rate: f64,

    /// Terminal punctuation occurrences per message
    pub punctuation_rate: f64,

    pub capitalization: CapitalizationPattern,
}

/// Assertiveness register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assertiveness {
    Assertive,
    Passive,
    Balanced,
}

/// Engagement depth bucket from mean message length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementLevel {
    High,
    Medium,
    Low,
}

/// Communication pattern summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationPatterns {
    pub formality: Formality,
    pub assertiveness: Assertiveness,
    pub engagement: EngagementLevel,

    /// Scaled type/token vocabulary ratio, 0-100
    pub verbal_fluency: u8,

    /// Fraction of messages containing a question mark
    pub question_frequency: f64,
}

/// Technical knowledge bucket from distinct indicator matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalLevel {
    Novice,
    Intermediate,
    Advanced,
    Expert,
}

/// Interests and expertise derived from topic keyword hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestProfile {
    pub technical_level: TechnicalLevel,

    /// Top topic categories exceeding the minimum hit count, at most three
    pub primary_interests: Vec<String>,

    /// Topics with very high hit counts, only held by advanced+ users
    pub expertise_areas: Vec<String>,
}

/// Activity rhythm over the fetched window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalPatterns {
    /// Top-3 UTC hours by message count
    pub peak_hours: Vec<u32>,

    /// Fraction of messages sent on Saturday or Sunday
    pub weekend_ratio: f64,
}

/// Direction of the relationship based on sentiment drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipTrajectory {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

/// Attachment style label from the timing/vulnerability cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentStyle {
    Secure,
    Anxious,
    Avoidant,
    Disorganized,
}

/// Attachment classification with its rule's fixed confidence
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttachmentAssessment {
    pub style: AttachmentStyle,

    /// Fixed confidence carried by the matching cascade rule
    pub confidence: f32,
}

/// Emotional bond stage from the ordered decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondStage {
    Nemesis,
    Stranger,
    Acquaintance,
    Regular,
    CloseFriend,
    Ally,
    Friend,
}

/// Communication style facet carried inside `PersonalityFacets`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationStyleSummary {
    pub formality: Formality,
    pub assertiveness: Assertiveness,
    pub engagement: EngagementLevel,
}

/// Deterministically generated personality facets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityFacets {
    /// Most frequent archetype labels, at most three
    pub dominant_archetypes: Vec<String>,

    /// Big Five traits bucketed low/medium/high
    pub big_five: BigFiveTraitLevels,

    pub communication_style: CommunicationStyleSummary,

    /// Detected quirks (short labels)
    pub quirks: Vec<String>,
}

/// The durable per-user profile aggregate
///
/// Created on first contact with all analytic fields absent; mutated in
/// place by each analysis run; never deleted by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    // === Identity ===
    pub user_id: String,
    pub username: String,

    // === Scorer outputs (absent until first analysis) ===
    pub big_five: Option<BigFiveScores>,
    pub emotional_intelligence: Option<EmotionalIntelligenceScores>,
    pub cognitive_style: Option<CognitiveStyleScores>,
    pub social_dynamics: Option<SocialDynamics>,
    pub behavioral_metrics: Option<BehavioralMetrics>,
    pub communication_patterns: Option<CommunicationPatterns>,
    pub interests: Option<InterestProfile>,
    pub temporal_patterns: Option<TemporalPatterns>,
    pub trajectory: Option<RelationshipTrajectory>,

    /// Relative change in type/token ratio between message halves
    pub vocabulary_growth_rate: Option<f64>,

    /// Engagement authenticity (non-low-effort fraction), 0-100
    pub authenticity_score: Option<u8>,

    // === Classifier outputs ===
    pub attachment: Option<AttachmentAssessment>,
    pub bond_stage: Option<BondStage>,

    // === Subjective assessment ===
    pub feelings: Option<UserFeelings>,
    pub personality_facets: Option<PersonalityFacets>,

    // === Bookkeeping ===
    /// Total historical message count, not just the fetched window
    pub message_count: u64,

    pub first_seen_at: DateTime<Utc>,
    pub last_interaction_at: DateTime<Utc>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// A fresh profile row for a user seen for the first time
    pub fn first_contact(user_id: &str, username: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            big_five: None,
            emotional_intelligence: None,
            cognitive_style: None,
            social_dynamics: None,
            behavioral_metrics: None,
            communication_patterns: None,
            interests: None,
            temporal_patterns: None,
            trajectory: None,
            vocabulary_growth_rate: None,
            authenticity_score: None,
            attachment: None,
            bond_stage: None,
            feelings: None,
            personality_facets: None,
            message_count: 0,
            first_seen_at: now,
            last_interaction_at: now,
            last_analyzed_at: None,
        }
    }

    /// Merge one analysis run's output into this profile
    pub fn apply_update(&mut self, update: &ProfileUpdate) {
        self.big_five = Some(update.big_five);
        self.emotional_intelligence = Some(update.emotional_intelligence);
        self.cognitive_style = Some(update.cognitive_style);
        self.social_dynamics = Some(update.social_dynamics.clone());
        self.behavioral_metrics = Some(update.behavioral_metrics.clone());
        self.communication_patterns = Some(update.communication_patterns.clone());
        self.interests = Some(update.interests.clone());
        self.temporal_patterns = Some(update.temporal_patterns.clone());
        self.trajectory = Some(update.trajectory);
        self.vocabulary_growth_rate = Some(update.vocabulary_growth_rate);
        self.authenticity_score = Some(update.authenticity_score);
        self.attachment = Some(update.attachment);
        self.bond_stage = Some(update.bond_stage);
        self.feelings = Some(update.feelings.clone());
        self.personality_facets = Some(update.personality_facets.clone());
        self.message_count = update.message_count;
        self.last_analyzed_at = Some(update.last_analyzed_at);
    }
}

/// The partial field set one analysis run writes to the profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub big_five: BigFiveScores,
    pub emotional_intelligence: EmotionalIntelligenceScores,
    pub cognitive_style: CognitiveStyleScores,
    pub social_dynamics: SocialDynamics,
    pub behavioral_metrics: BehavioralMetrics,
    pub communication_patterns: CommunicationPatterns,
    pub interests: InterestProfile,
    pub temporal_patterns: TemporalPatterns,
    pub trajectory: RelationshipTrajectory,
    pub vocabulary_growth_rate: f64,
    pub authenticity_score: u8,
    pub attachment: AttachmentAssessment,
    pub bond_stage: BondStage,
    pub feelings: UserFeelings,
    pub personality_facets: PersonalityFacets,
    pub message_count: u64,
    pub last_analyzed_at: DateTime<Utc>,
}

/// Append-only record of one analysis run
///
/// Write-once; ordering is total by `analysis_timestamp` per user. The
/// engine never rewrites history, only appends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisHistoryEntry {
    pub id: Uuid,
    pub user_id: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub feelings: UserFeelings,
    pub personality_facets: PersonalityFacets,
    pub message_count_at_analysis: u64,

    /// Human-readable diff against the prior snapshot, stored verbatim
    pub changes_summary: String,
}
