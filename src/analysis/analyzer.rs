//! The per-user analysis pipeline
//!
//! Runs collection → deterministic scoring → classification → subjective
//! assessment → change detection, then writes the result. The writer
//! appends the history entry BEFORE updating the profile: if the append
//! fails the profile is untouched, so `last_analyzed_at` can never advance
//! without an auditable history record. The inverse failure (profile
//! update failing after a successful append) leaves a dangling history
//! entry, which we accept as the lesser inconsistency.

use crate::analysis::change::summarize_change;
use crate::analysis::classifiers::{classify_attachment, classify_bond_stage, BondSignals};
use crate::analysis::collector::DataCollector;
use crate::analysis::scorers::behavior::{
    score_behavioral_metrics, score_communication_patterns,
};
use crate::analysis::scorers::cognition::{score_cognitive_style, score_social_dynamics};
use crate::analysis::scorers::interests::score_interests;
use crate::analysis::scorers::personality::{score_big_five, score_emotional_intelligence};
use crate::analysis::scorers::temporal::{
    score_engagement_authenticity, score_relationship_trajectory, score_temporal_patterns,
    score_vocabulary_growth,
};
use crate::analysis::subjective::{generate_feelings, generate_personality_facets};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::services::LanguageModel;
use crate::storage::ProfileStore;
use crate::types::{AnalysisHistoryEntry, ProfileUpdate};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// What one `analyze_user` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The profile was updated and a history entry appended
    Updated,

    /// Too few messages observed; nothing was written
    SkippedBelowThreshold,
}

/// Runs the full analysis pipeline for single users
///
/// Concurrent runs for the SAME user must be serialized by the caller
/// (the provided `BatchScheduler` never overlaps them); otherwise the
/// previous-feelings comparison in the change detector can read an
/// interleaved write.
pub struct ProfileAnalyzer {
    store: Arc<dyn ProfileStore>,
    model: Option<Arc<dyn LanguageModel>>,
    config: AnalysisConfig,
    collector: DataCollector,
}

impl ProfileAnalyzer {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        model: Option<Arc<dyn LanguageModel>>,
        config: AnalysisConfig,
    ) -> Self {
        let collector = DataCollector::new(store.clone(), config.clone());
        Self {
            store,
            model,
            config,
            collector,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run one full analysis pass for a user
    ///
    /// Store read/write errors propagate (fatal for this run); a failed
    /// subjective generation degrades to the neutral fallback instead.
    pub async fn analyze_user(&self, user_id: &str, username: &str) -> Result<AnalysisOutcome> {
        info!(user_id, username, "starting profile analysis");

        let data = self.collector.collect(user_id, username).await?;
        if data.messages.len() < self.config.min_message_threshold {
            debug!(
                user_id,
                observed = data.messages.len(),
                threshold = self.config.min_message_threshold,
                "below message threshold; skipping without writes"
            );
            return Ok(AnalysisOutcome::SkippedBelowThreshold);
        }

        let profile = self.store.ensure_profile(user_id, username).await?;

        // Deterministic layer: pure functions, no suspension points
        let big_five = score_big_five(&data);
        let emotional_intelligence = score_emotional_intelligence(&data);
        let cognitive_style = score_cognitive_style(&data);
        let social_dynamics = score_social_dynamics(&data);
        let behavioral_metrics = score_behavioral_metrics(&data);
        let communication_patterns = score_communication_patterns(&data);
        let interests = score_interests(&data);
        let temporal_patterns = score_temporal_patterns(&data);
        let trajectory = score_relationship_trajectory(&data);
        let vocabulary_growth_rate = score_vocabulary_growth(&data);
        let authenticity_score = score_engagement_authenticity(&data);
        let attachment = classify_attachment(&data);

        // Subjective layer: model-assisted with a neutral fallback
        let feelings = generate_feelings(
            self.model.as_deref(),
            &data,
            self.config.llm_timeout,
            self.config.recent_lines,
        )
        .await;

        let now = Utc::now();
        let bond_stage = classify_bond_stage(&BondSignals {
            trust_level: feelings.trust_level,
            affinity_score: feelings.affinity_score,
            message_count: data.total_message_count,
            days_since_first_contact: (now - profile.first_seen_at).num_days(),
        });

        let personality_facets = generate_personality_facets(
            &data,
            &big_five,
            &communication_patterns,
            &behavioral_metrics,
        );

        let changes_summary = summarize_change(profile.feelings.as_ref(), &feelings);

        // History first, then the profile (see module docs)
        let entry = AnalysisHistoryEntry {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            analysis_timestamp: now,
            feelings: feelings.clone(),
            personality_facets: personality_facets.clone(),
            message_count_at_analysis: data.total_message_count,
            changes_summary: changes_summary.clone(),
        };
        self.store.append_history(&entry).await?;

        let update = ProfileUpdate {
            big_five,
            emotional_intelligence,
            cognitive_style,
            social_dynamics,
            behavioral_metrics,
            communication_patterns,
            interests,
            temporal_patterns,
            trajectory,
            vocabulary_growth_rate,
            authenticity_score,
            attachment,
            bond_stage,
            feelings,
            personality_facets,
            message_count: data.total_message_count,
            last_analyzed_at: now,
        };
        self.store.update_profile(user_id, &update).await?;

        info!(
            user_id,
            message_count = data.total_message_count,
            summary = %changes_summary,
            "profile analysis complete"
        );
        Ok(AnalysisOutcome::Updated)
    }
}
