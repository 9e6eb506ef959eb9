//! End-to-end pipeline tests over the in-memory store
//!
//! Exercises the analyzer and batch scheduler against stub language
//! models and fault-injecting store wrappers: threshold no-ops, the
//! neutral-fallback contract, writer ordering, and batch failure
//! isolation.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use ethos::storage::memory::InMemoryStore;
use ethos::storage::{MessageQuery, ProfileStore};
use ethos::types::{
    AnalysisHistoryEntry, MessageSample, ProfileUpdate, SenderKind, SentimentAnnotation,
    SentimentLabel, UserProfile,
};
use ethos::{
    AnalysisConfig, AnalysisOutcome, BatchScheduler, EthosError, LanguageModel, ProfileAnalyzer,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn fast_config() -> AnalysisConfig {
    // Surface engine logs when a test run sets RUST_LOG
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    AnalysisConfig {
        pacing_delay: Duration::from_millis(0),
        llm_timeout: Duration::from_secs(2),
        ..Default::default()
    }
}

fn message(id: &str, user_id: &str, content: &str, minutes_ago: i64) -> MessageSample {
    MessageSample {
        id: id.to_string(),
        timestamp: Utc::now() - ChronoDuration::minutes(minutes_ago),
        sender_kind: SenderKind::Human,
        user_id: user_id.to_string(),
        username: format!("name-{user_id}"),
        channel_id: "general".to_string(),
        content: content.to_string(),
        sentiment: Some(SentimentAnnotation {
            label: SentimentLabel::Positive,
            score: 0.4,
            emotions: vec!["warmth".to_string()],
            archetypes: vec!["mentor".to_string()],
            formality: None,
        }),
    }
}

async fn seed_user(store: &InMemoryStore, user_id: &str, count: usize) {
    for i in 0..count {
        store
            .insert_message(message(
                &format!("{user_id}-m{i}"),
                user_id,
                "thanks for the help, i appreciate the thorough plan we made together",
                (i * 30) as i64,
            ))
            .await;
    }
}

/// Language model that always errors
struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn generate(&self, _prompt: &str, _schema: &Value) -> ethos::Result<Value> {
        Err(EthosError::LlmApi("provider down".to_string()))
    }
}

/// Language model returning a fixed object
struct CannedModel(Value);

#[async_trait]
impl LanguageModel for CannedModel {
    async fn generate(&self, _prompt: &str, _schema: &Value) -> ethos::Result<Value> {
        Ok(self.0.clone())
    }
}

fn canned_feelings(trust: i64, affinity: i64, sentiment: &str) -> CannedModel {
    CannedModel(json!({
        "sentiment": sentiment,
        "trust_level": trust,
        "affinity_score": affinity,
        "thoughts": "reliably helpful in every thread",
        "facets": ["generous", "steady"],
        "notable_patterns": ["answers newcomers first"]
    }))
}

#[tokio::test]
async fn below_threshold_run_is_a_complete_noop() {
    let store = Arc::new(InMemoryStore::new());
    seed_user(&store, "u-few", 5).await;

    let analyzer = ProfileAnalyzer::new(store.clone(), None, fast_config());
    let outcome = analyzer.analyze_user("u-few", "name-u-few").await.unwrap();

    assert_eq!(outcome, AnalysisOutcome::SkippedBelowThreshold);
    assert_eq!(store.history_len().await, 0);
    let profile = store.get_profile("u-few").await.unwrap().unwrap();
    assert!(profile.big_five.is_none());
    assert!(profile.feelings.is_none());
    assert!(profile.last_analyzed_at.is_none());
}

#[tokio::test]
async fn failing_model_still_writes_neutral_profile() {
    let store = Arc::new(InMemoryStore::new());
    seed_user(&store, "u-1", 15).await;

    let analyzer = ProfileAnalyzer::new(store.clone(), Some(Arc::new(FailingModel)), fast_config());
    let outcome = analyzer.analyze_user("u-1", "name-u-1").await.unwrap();

    assert_eq!(outcome, AnalysisOutcome::Updated);
    let profile = store.get_profile("u-1").await.unwrap().unwrap();
    let feelings = profile.feelings.unwrap();
    assert_eq!(feelings.sentiment, SentimentLabel::Neutral);
    assert_eq!(feelings.trust_level, 50);
    assert_eq!(feelings.affinity_score, 0);

    // Deterministic layer still ran
    assert!(profile.big_five.is_some());
    assert!(profile.last_analyzed_at.is_some());
    assert_eq!(store.history_len().await, 1);

    let history = store.history_for("u-1", 10).await.unwrap();
    assert_eq!(history[0].changes_summary, "Initial analysis");
}

#[tokio::test]
async fn second_run_reports_trust_jump() {
    let store = Arc::new(InMemoryStore::new());
    seed_user(&store, "u-1", 15).await;

    let first = ProfileAnalyzer::new(
        store.clone(),
        Some(Arc::new(canned_feelings(40, 10, "positive"))),
        fast_config(),
    );
    first.analyze_user("u-1", "name-u-1").await.unwrap();

    let second = ProfileAnalyzer::new(
        store.clone(),
        Some(Arc::new(canned_feelings(55, 12, "positive"))),
        fast_config(),
    );
    second.analyze_user("u-1", "name-u-1").await.unwrap();

    let history = store.history_for("u-1", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    // Newest first
    assert!(history[0].changes_summary.contains("Trust increased by 15"));
    assert_eq!(history[1].changes_summary, "Initial analysis");
}

#[tokio::test]
async fn sentiment_flip_with_small_deltas_reports_sentiment_only() {
    let store = Arc::new(InMemoryStore::new());
    seed_user(&store, "u-1", 15).await;

    ProfileAnalyzer::new(
        store.clone(),
        Some(Arc::new(canned_feelings(50, 10, "positive"))),
        fast_config(),
    )
    .analyze_user("u-1", "name-u-1")
    .await
    .unwrap();

    ProfileAnalyzer::new(
        store.clone(),
        Some(Arc::new(canned_feelings(53, 6, "negative"))),
        fast_config(),
    )
    .analyze_user("u-1", "name-u-1")
    .await
    .unwrap();

    let history = store.history_for("u-1", 10).await.unwrap();
    assert_eq!(
        history[0].changes_summary,
        "Sentiment shifted from positive to negative"
    );
}

#[tokio::test]
async fn deterministic_layer_is_idempotent_across_runs() {
    let store = Arc::new(InMemoryStore::new());
    seed_user(&store, "u-1", 20).await;

    let analyzer = ProfileAnalyzer::new(store.clone(), None, fast_config());
    analyzer.analyze_user("u-1", "name-u-1").await.unwrap();
    let first = store.get_profile("u-1").await.unwrap().unwrap();

    analyzer.analyze_user("u-1", "name-u-1").await.unwrap();
    let second = store.get_profile("u-1").await.unwrap().unwrap();

    let a = first.big_five.unwrap();
    let b = second.big_five.unwrap();
    assert_eq!(a.openness, b.openness);
    assert_eq!(a.neuroticism, b.neuroticism);
    assert_eq!(
        first.communication_patterns.unwrap().verbal_fluency,
        second.communication_patterns.unwrap().verbal_fluency
    );
    assert_eq!(first.authenticity_score, second.authenticity_score);
    assert_eq!(
        first.attachment.unwrap().style,
        second.attachment.unwrap().style
    );
}

/// Store wrapper that fails message reads for one user
struct FailingReadsFor {
    inner: Arc<InMemoryStore>,
    poisoned_user: String,
}

#[async_trait]
impl ProfileStore for FailingReadsFor {
    async fn fetch_messages(&self, query: &MessageQuery) -> ethos::Result<Vec<MessageSample>> {
        if query.user_id.as_deref() == Some(self.poisoned_user.as_str()) {
            return Err(EthosError::Store("read replica offline".to_string()));
        }
        self.inner.fetch_messages(query).await
    }

    async fn count_messages(&self, user_id: &str, kind: SenderKind) -> ethos::Result<u64> {
        self.inner.count_messages(user_id, kind).await
    }

    async fn get_profile(&self, user_id: &str) -> ethos::Result<Option<UserProfile>> {
        self.inner.get_profile(user_id).await
    }

    async fn ensure_profile(&self, user_id: &str, username: &str) -> ethos::Result<UserProfile> {
        self.inner.ensure_profile(user_id, username).await
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> ethos::Result<()> {
        self.inner.update_profile(user_id, update).await
    }

    async fn append_history(&self, entry: &AnalysisHistoryEntry) -> ethos::Result<()> {
        self.inner.append_history(entry).await
    }

    async fn history_for(
        &self,
        user_id: &str,
        limit: usize,
    ) -> ethos::Result<Vec<AnalysisHistoryEntry>> {
        self.inner.history_for(user_id, limit).await
    }

    async fn users_pending_analysis(&self, limit: usize) -> ethos::Result<Vec<(String, String)>> {
        self.inner.users_pending_analysis(limit).await
    }
}

#[tokio::test]
async fn batch_continues_past_failing_user() {
    let inner = Arc::new(InMemoryStore::new());
    seed_user(&inner, "u-a", 15).await;
    seed_user(&inner, "u-b", 15).await;
    seed_user(&inner, "u-c", 15).await;

    let store: Arc<dyn ProfileStore> = Arc::new(FailingReadsFor {
        inner: inner.clone(),
        poisoned_user: "u-b".to_string(),
    });

    let analyzer = Arc::new(ProfileAnalyzer::new(store.clone(), None, fast_config()));
    let scheduler = BatchScheduler::new(analyzer, store);
    let report = scheduler.run_batch(10).await.unwrap();

    assert_eq!(report.scanned, 3);
    assert_eq!(report.analyzed, 2);
    assert_eq!(report.failed, 1);

    // A and C were each processed exactly once; B never produced a record
    assert_eq!(inner.history_for("u-a", 10).await.unwrap().len(), 1);
    assert_eq!(inner.history_for("u-b", 10).await.unwrap().len(), 0);
    assert_eq!(inner.history_for("u-c", 10).await.unwrap().len(), 1);
    assert!(inner.get_profile("u-b").await.unwrap().unwrap().last_analyzed_at.is_none());
}

/// Store wrapper whose history appends always fail
struct FailingHistory {
    inner: Arc<InMemoryStore>,
}

#[async_trait]
impl ProfileStore for FailingHistory {
    async fn fetch_messages(&self, query: &MessageQuery) -> ethos::Result<Vec<MessageSample>> {
        self.inner.fetch_messages(query).await
    }

    async fn count_messages(&self, user_id: &str, kind: SenderKind) -> ethos::Result<u64> {
        self.inner.count_messages(user_id, kind).await
    }

    async fn get_profile(&self, user_id: &str) -> ethos::Result<Option<UserProfile>> {
        self.inner.get_profile(user_id).await
    }

    async fn ensure_profile(&self, user_id: &str, username: &str) -> ethos::Result<UserProfile> {
        self.inner.ensure_profile(user_id, username).await
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> ethos::Result<()> {
        self.inner.update_profile(user_id, update).await
    }

    async fn append_history(&self, _entry: &AnalysisHistoryEntry) -> ethos::Result<()> {
        Err(EthosError::Store("history partition full".to_string()))
    }

    async fn history_for(
        &self,
        user_id: &str,
        limit: usize,
    ) -> ethos::Result<Vec<AnalysisHistoryEntry>> {
        self.inner.history_for(user_id, limit).await
    }

    async fn users_pending_analysis(&self, limit: usize) -> ethos::Result<Vec<(String, String)>> {
        self.inner.users_pending_analysis(limit).await
    }
}

#[tokio::test]
async fn failed_history_append_leaves_profile_untouched() {
    let inner = Arc::new(InMemoryStore::new());
    seed_user(&inner, "u-1", 15).await;

    let store: Arc<dyn ProfileStore> = Arc::new(FailingHistory {
        inner: inner.clone(),
    });
    let analyzer = ProfileAnalyzer::new(store, None, fast_config());

    let result = analyzer.analyze_user("u-1", "name-u-1").await;
    assert!(result.is_err());

    // The append-first ordering means last_analyzed_at never advanced
    let profile = inner.get_profile("u-1").await.unwrap().unwrap();
    assert!(profile.last_analyzed_at.is_none());
    assert!(profile.feelings.is_none());
    assert_eq!(inner.history_len().await, 0);
}

#[tokio::test]
async fn bond_stage_reflects_generated_trust() {
    let store = Arc::new(InMemoryStore::new());
    // Plenty of volume so the friend tiers are reachable
    seed_user(&store, "u-1", 60).await;

    let analyzer = ProfileAnalyzer::new(
        store.clone(),
        Some(Arc::new(canned_feelings(72, 65, "positive"))),
        fast_config(),
    );
    analyzer.analyze_user("u-1", "name-u-1").await.unwrap();

    let profile = store.get_profile("u-1").await.unwrap().unwrap();
    assert_eq!(profile.bond_stage.unwrap(), ethos::BondStage::Ally);
    assert_eq!(profile.message_count, 60);
}

#[tokio::test]
async fn batch_respects_limit_and_updates_pending_queue() {
    let store = Arc::new(InMemoryStore::new());
    seed_user(&store, "u-1", 15).await;
    seed_user(&store, "u-2", 15).await;

    let analyzer = Arc::new(ProfileAnalyzer::new(store.clone(), None, fast_config()));
    let scheduler = BatchScheduler::new(analyzer, store.clone());

    let report = scheduler.run_batch(1).await.unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.analyzed, 1);

    // The analyzed user leaves the queue; the other remains
    let remaining = store.users_pending_analysis(10).await.unwrap();
    assert_eq!(remaining.len(), 1);
}
