//! Subjective assessment generation
//!
//! Two independent steps. `generate_feelings` asks the language model for
//! a structured `UserFeelings` object and substitutes a fixed neutral
//! fallback on ANY failure (network, timeout, schema mismatch); the
//! pipeline never aborts because this call failed. The personality-facets
//! step is fully deterministic over already-collected annotations and
//! scorer outputs and requires no model call.

use crate::analysis::collector::UserAnalysisData;
use crate::lexicon::{self, LexiconCategory, EMOJI_RE};
use crate::services::LanguageModel;
use crate::types::{
    BehavioralMetrics, BigFiveScores, BigFiveTraitLevels, CommunicationPatterns,
    CommunicationStyleSummary, MessageSample, PersonalityFacets, SentimentLabel, UserFeelings,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum characters of one transcript line embedded in the prompt
const MAX_LINE_CHARS: usize = 200;

/// Upper bounds on list fields of the generated object
const MAX_FACETS: usize = 5;
const MAX_NOTABLE_PATTERNS: usize = 5;

/// Shape the model must return: `UserFeelings` minus `last_updated`
fn feelings_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "sentiment": {"type": "string", "enum": ["positive", "negative", "neutral", "mixed"]},
            "trust_level": {"type": "integer", "minimum": 0, "maximum": 100},
            "affinity_score": {"type": "integer", "minimum": -100, "maximum": 100},
            "thoughts": {"type": "string"},
            "facets": {"type": "array", "items": {"type": "string"}, "maxItems": MAX_FACETS},
            "notable_patterns": {"type": "array", "items": {"type": "string"}, "maxItems": MAX_NOTABLE_PATTERNS}
        },
        "required": ["sentiment", "trust_level", "affinity_score", "thoughts"]
    })
}

/// Untrusted model output before clamping
#[derive(Debug, Deserialize)]
struct FeelingsResponse {
    sentiment: SentimentLabel,
    trust_level: i64,
    affinity_score: i64,
    thoughts: String,
    #[serde(default)]
    facets: Vec<String>,
    #[serde(default)]
    notable_patterns: Vec<String>,
}

/// Generate the subjective feelings assessment
///
/// Returns the fixed neutral fallback when no model is configured, when
/// the call errors, when it exceeds `llm_timeout`, or when the output does
/// not conform to the schema.
pub async fn generate_feelings(
    model: Option<&dyn LanguageModel>,
    data: &UserAnalysisData,
    llm_timeout: Duration,
    recent_lines: usize,
) -> UserFeelings {
    let now = Utc::now();
    let Some(model) = model else {
        debug!(user_id = %data.user_id, "no language model configured; using neutral fallback");
        return UserFeelings::neutral_fallback(now);
    };

    let prompt = build_feelings_prompt(data, recent_lines);
    let schema = feelings_schema();

    let generated =
        match tokio::time::timeout(llm_timeout, model.generate(&prompt, &schema)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!(user_id = %data.user_id, error = %e, "feelings generation failed; using neutral fallback");
                return UserFeelings::neutral_fallback(now);
            }
            Err(_) => {
                warn!(
                    user_id = %data.user_id,
                    timeout_secs = llm_timeout.as_secs(),
                    "feelings generation timed out; using neutral fallback"
                );
                return UserFeelings::neutral_fallback(now);
            }
        };

    match serde_json::from_value::<FeelingsResponse>(generated) {
        Ok(response) => clamp_response(response, now),
        Err(e) => {
            warn!(user_id = %data.user_id, error = %e, "feelings object malformed; using neutral fallback");
            UserFeelings::neutral_fallback(now)
        }
    }
}

/// Clamp every generated field into its declared bounds
fn clamp_response(response: FeelingsResponse, now: chrono::DateTime<Utc>) -> UserFeelings {
    let mut facets = response.facets;
    facets.truncate(MAX_FACETS);
    let mut notable_patterns = response.notable_patterns;
    notable_patterns.truncate(MAX_NOTABLE_PATTERNS);

    UserFeelings {
        sentiment: response.sentiment,
        trust_level: response.trust_level.clamp(0, 100) as u8,
        affinity_score: response.affinity_score.clamp(-100, 100) as i8,
        thoughts: response.thoughts,
        facets,
        notable_patterns,
        last_updated: now,
    }
}

/// Build the assessment prompt from the collected window
///
/// Embeds the merged recent conversation (the user's lines and counterpart
/// responses), the aggregate sentiment breakdown, the recent trend, the
/// dominant emotions/archetypes, and a worked scoring rubric.
pub fn build_feelings_prompt(data: &UserAnalysisData, recent_lines: usize) -> String {
    let transcript = recent_transcript(data, recent_lines * 3);
    let patterns = &data.patterns;

    let (older_mean, newer_mean) = recent_trend(data);

    format!(
        r#"You are maintaining a long-running impression of the chat participant "{username}".

Recent conversation (oldest first; [>] marks {username}'s own lines):
{transcript}

Aggregate sentiment of their messages: {positive} positive, {negative} negative, {neutral} neutral, {mixed} mixed (mean score {mean_score:.2}).
Recent trend: first half of the window averaged {older_mean:.2}, second half {newer_mean:.2}.
Dominant emotions: {emotions}.
Dominant archetypes: {archetypes}.

Score your impression of them:
- trust_level (0-100): 0 = actively hostile or deceptive, 50 = unknown quantity, 100 = deeply reliable. Example: someone who repeatedly keeps their word and defuses conflicts scored 82.
- affinity_score (-100 to 100): -100 = strong aversion, 0 = indifferent, 100 = strong fondness. Example: someone pleasant but distant scored 35; someone who insulted others repeatedly scored -60.
- sentiment: your overall reading of them (positive, negative, neutral, or mixed).
- thoughts: one or two sentences of candid impression.
- facets: 1-5 short personality labels (e.g. "dry humor", "protective of newcomers").
- notable_patterns: 0-5 short behavioral observations (e.g. "goes quiet when contradicted").
"#,
        username = data.username,
        transcript = transcript,
        positive = patterns.positive,
        negative = patterns.negative,
        neutral = patterns.neutral,
        mixed = patterns.mixed,
        mean_score = patterns.mean_score,
        older_mean = older_mean,
        newer_mean = newer_mean,
        emotions = join_or_none(&patterns.dominant_emotions),
        archetypes = join_or_none(&patterns.dominant_archetypes),
    )
}

fn join_or_none(labels: &[String]) -> String {
    if labels.is_empty() {
        "none detected".to_string()
    } else {
        labels.join(", ")
    }
}

/// Merge user and context lines chronologically and keep the newest `take`
fn recent_transcript(data: &UserAnalysisData, take: usize) -> String {
    let mut lines: Vec<&MessageSample> = data
        .messages
        .iter()
        .chain(data.context_messages.iter())
        .collect();
    lines.sort_by_key(|m| m.timestamp);

    let skip = lines.len().saturating_sub(take);
    lines
        .iter()
        .skip(skip)
        .map(|m| {
            let marker = if m.user_id == data.user_id { "[>]" } else { "[ ]" };
            let content: String = m.content.chars().take(MAX_LINE_CHARS).collect();
            format!("{} {}: {}", marker, m.username, content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mean sentiment of the first and second halves of the annotated window
fn recent_trend(data: &UserAnalysisData) -> (f32, f32) {
    let scores: Vec<f32> = data
        .messages
        .iter()
        .rev()
        .filter_map(|m| m.sentiment.as_ref())
        .map(|a| a.score)
        .collect();
    if scores.is_empty() {
        return (0.0, 0.0);
    }
    let mid = scores.len() / 2;
    let mean = |half: &[f32]| {
        if half.is_empty() {
            0.0
        } else {
            half.iter().sum::<f32>() / half.len() as f32
        }
    };
    (mean(&scores[..mid]), mean(&scores[mid..]))
}

// Quirk detection thresholds
const QUIRK_EMOJI_RATE: f64 = 0.5;
const QUIRK_TECHNICAL_DENSITY: f64 = 0.3;
const QUIRK_QUESTION_FREQUENCY: f64 = 0.35;
const QUIRK_VERBOSE_LENGTH: f64 = 200.0;
const QUIRK_TERSE_LENGTH: f64 = 20.0;
const QUIRK_EMPATHY_DENSITY: f64 = 0.08;

/// Compute personality facets deterministically
///
/// Majority-vote over annotation categoricals plus a quirk-detection pass;
/// no model call, cannot fail on well-formed input.
pub fn generate_personality_facets(
    data: &UserAnalysisData,
    big_five: &BigFiveScores,
    communication: &CommunicationPatterns,
    behavioral: &BehavioralMetrics,
) -> PersonalityFacets {
    PersonalityFacets {
        dominant_archetypes: data.patterns.dominant_archetypes.clone(),
        big_five: BigFiveTraitLevels::from(big_five),
        communication_style: CommunicationStyleSummary {
            formality: communication.formality,
            assertiveness: communication.assertiveness,
            engagement: communication.engagement,
        },
        quirks: detect_quirks(data, communication, behavioral),
    }
}

fn detect_quirks(
    data: &UserAnalysisData,
    communication: &CommunicationPatterns,
    behavioral: &BehavioralMetrics,
) -> Vec<String> {
    let messages = &data.messages;
    let mut quirks = Vec::new();

    let emoji_rate = if messages.is_empty() {
        0.0
    } else {
        messages
            .iter()
            .map(|m| EMOJI_RE.find_iter(&m.content).count())
            .sum::<usize>() as f64
            / messages.len() as f64
    };
    if emoji_rate > QUIRK_EMOJI_RATE {
        quirks.push("heavy emoji use".to_string());
    }
    if lexicon::density(LexiconCategory::TechnicalVocabulary, messages) > QUIRK_TECHNICAL_DENSITY {
        quirks.push("technical vocabulary".to_string());
    }
    if communication.question_frequency > QUIRK_QUESTION_FREQUENCY {
        quirks.push("asks a lot of questions".to_string());
    }
    if behavioral.avg_message_length > QUIRK_VERBOSE_LENGTH {
        quirks.push("writes long messages".to_string());
    } else if behavioral.avg_message_length > 0.0
        && behavioral.avg_message_length < QUIRK_TERSE_LENGTH
    {
        quirks.push("keeps it brief".to_string());
    }
    if lexicon::density(LexiconCategory::EmpathyPhrases, messages) > QUIRK_EMPATHY_DENSITY {
        quirks.push("checks in on others".to_string());
    }

    quirks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scorers::behavior::{
        score_behavioral_metrics, score_communication_patterns,
    };
    use crate::analysis::scorers::personality::score_big_five;
    use crate::analysis::scorers::test_support::{annotated_msg, data_from, msg};
    use crate::error::{EthosError, Result};
    use async_trait::async_trait;

    struct FailingModel;

    #[async_trait]
    impl LanguageModel for FailingModel {
        async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<Value> {
            Err(EthosError::LlmApi("provider unavailable".to_string()))
        }
    }

    struct CannedModel(Value);

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_fallback_when_model_fails() {
        let data = data_from(vec![msg("hello", 0)]);
        let feelings =
            generate_feelings(Some(&FailingModel), &data, Duration::from_secs(5), 10).await;
        assert_eq!(feelings.sentiment, SentimentLabel::Neutral);
        assert_eq!(feelings.trust_level, 50);
        assert_eq!(feelings.affinity_score, 0);
    }

    #[tokio::test]
    async fn test_fallback_without_model() {
        let data = data_from(vec![]);
        let feelings = generate_feelings(None, &data, Duration::from_secs(5), 10).await;
        assert_eq!(feelings.trust_level, 50);
    }

    #[tokio::test]
    async fn test_generated_values_are_clamped() {
        let model = CannedModel(json!({
            "sentiment": "positive",
            "trust_level": 250,
            "affinity_score": -400,
            "thoughts": "seems great",
            "facets": ["warm", "curious", "funny", "loyal", "blunt", "extra", "extra2"],
            "notable_patterns": []
        }));
        let data = data_from(vec![msg("hello", 0)]);
        let feelings = generate_feelings(Some(&model), &data, Duration::from_secs(5), 10).await;
        assert_eq!(feelings.trust_level, 100);
        assert_eq!(feelings.affinity_score, -100);
        assert_eq!(feelings.facets.len(), 5);
        assert_eq!(feelings.sentiment, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_malformed_object_falls_back() {
        let model = CannedModel(json!({
            "sentiment": "positive",
            "trust_level": "very high",
            "affinity_score": 10,
            "thoughts": "ok"
        }));
        let data = data_from(vec![msg("hello", 0)]);
        let feelings = generate_feelings(Some(&model), &data, Duration::from_secs(5), 10).await;
        assert_eq!(feelings.trust_level, 50);
        assert_eq!(feelings.sentiment, SentimentLabel::Neutral);
    }

    #[test]
    fn test_prompt_embeds_context_and_breakdown() {
        let mut peer = msg("welcome back!", 3);
        peer.user_id = "u-2".to_string();
        peer.username = "dana".to_string();

        let mut data = data_from(vec![
            annotated_msg("glad to be here", 1, SentimentLabel::Positive, 0.7),
            annotated_msg("rough week though", 2, SentimentLabel::Negative, -0.3),
        ]);
        data.context_messages = vec![peer];

        let prompt = build_feelings_prompt(&data, 10);
        assert!(prompt.contains("[>] tester: glad to be here"));
        assert!(prompt.contains("[ ] dana: welcome back!"));
        assert!(prompt.contains("1 positive, 1 negative"));
        assert!(prompt.contains("trust_level"));
    }

    #[test]
    fn test_transcript_is_chronological_and_bounded() {
        let messages: Vec<_> = (0..50).map(|i| msg(&format!("line {i}"), i)).collect();
        let data = data_from(messages);
        let transcript = recent_transcript(&data, 6);
        let lines: Vec<&str> = transcript.lines().collect();
        assert_eq!(lines.len(), 6);
        // Oldest of the kept lines first, newest last
        assert!(lines[0].contains("line 5"));
        assert!(lines[5].contains("line 0"));
    }

    #[test]
    fn test_quirk_detection() {
        let messages: Vec<_> = (0..4)
            .map(|i| msg("tiny? 🎉", i))
            .collect();
        let data = data_from(messages);
        let communication = score_communication_patterns(&data);
        let behavioral = score_behavioral_metrics(&data);
        let big_five = score_big_five(&data);

        let facets = generate_personality_facets(&data, &big_five, &communication, &behavioral);
        assert!(facets.quirks.contains(&"heavy emoji use".to_string()));
        assert!(facets.quirks.contains(&"asks a lot of questions".to_string()));
        assert!(facets.quirks.contains(&"keeps it brief".to_string()));
    }

    #[test]
    fn test_facets_mirror_scorer_outputs() {
        let data = data_from(vec![msg("plain message without anything special", 0)]);
        let communication = score_communication_patterns(&data);
        let behavioral = score_behavioral_metrics(&data);
        let big_five = score_big_five(&data);

        let facets = generate_personality_facets(&data, &big_five, &communication, &behavioral);
        assert_eq!(facets.communication_style.formality, communication.formality);
        assert!(facets.dominant_archetypes.is_empty());
    }
}
