//! In-memory `ProfileStore` implementation
//!
//! Reference backend used by the integration tests and by hosts that embed
//! the engine without a database. Messages are held newest-first per the
//! store contract; history is strictly append-only.

use crate::error::{EthosError, Result};
use crate::storage::{MessageQuery, ProfileStore};
use crate::types::{
    AnalysisHistoryEntry, MessageSample, ProfileUpdate, SenderKind, UserProfile,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory store backed by `tokio::sync::RwLock` maps
#[derive(Default)]
pub struct InMemoryStore {
    messages: RwLock<Vec<MessageSample>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
    history: RwLock<Vec<AnalysisHistoryEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message as if the ingestion pipeline had stored it
    ///
    /// Keeps the user's profile bookkeeping (`message_count`,
    /// `first_seen_at`, `last_interaction_at`) current, creating a
    /// first-contact row for unseen human senders.
    pub async fn insert_message(&self, message: MessageSample) {
        if message.sender_kind == SenderKind::Human {
            let mut profiles = self.profiles.write().await;
            let profile = profiles
                .entry(message.user_id.clone())
                .or_insert_with(|| {
                    UserProfile::first_contact(
                        &message.user_id,
                        &message.username,
                        message.timestamp,
                    )
                });
            profile.message_count += 1;
            if message.timestamp < profile.first_seen_at {
                profile.first_seen_at = message.timestamp;
            }
            if message.timestamp > profile.last_interaction_at {
                profile.last_interaction_at = message.timestamp;
            }
        }
        self.messages.write().await.push(message);
    }

    /// Number of stored history entries, across all users
    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }
}

fn matches(query: &MessageQuery, message: &MessageSample) -> bool {
    if let Some(user_id) = &query.user_id {
        if &message.user_id != user_id {
            return false;
        }
    }
    if let Some(channel_id) = &query.channel_id {
        if &message.channel_id != channel_id {
            return false;
        }
    }
    if let Some(kind) = query.sender_kind {
        if message.sender_kind != kind {
            return false;
        }
    }
    if let Some(after) = query.after {
        if message.timestamp <= after {
            return false;
        }
    }
    if let Some(before) = query.before {
        if message.timestamp >= before {
            return false;
        }
    }
    true
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<MessageSample>> {
        let messages = self.messages.read().await;
        let mut hits: Vec<MessageSample> = messages
            .iter()
            .filter(|m| matches(query, m))
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        hits.truncate(query.limit);
        Ok(hits)
    }

    async fn count_messages(&self, user_id: &str, sender_kind: SenderKind) -> Result<u64> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.user_id == user_id && m.sender_kind == sender_kind)
            .count() as u64)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn ensure_profile(&self, user_id: &str, username: &str) -> Result<UserProfile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::first_contact(user_id, username, chrono::Utc::now()));
        Ok(profile.clone())
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| EthosError::Store(format!("no profile for user {user_id}")))?;
        profile.apply_update(update);
        Ok(())
    }

    async fn append_history(&self, entry: &AnalysisHistoryEntry) -> Result<()> {
        self.history.write().await.push(entry.clone());
        Ok(())
    }

    async fn history_for(&self, user_id: &str, limit: usize) -> Result<Vec<AnalysisHistoryEntry>> {
        let history = self.history.read().await;
        let mut entries: Vec<AnalysisHistoryEntry> = history
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.analysis_timestamp.cmp(&a.analysis_timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn users_pending_analysis(&self, limit: usize) -> Result<Vec<(String, String)>> {
        let profiles = self.profiles.read().await;
        let mut pending: Vec<&UserProfile> = profiles
            .values()
            .filter(|p| match p.last_analyzed_at {
                None => true,
                Some(analyzed) => p.last_interaction_at > analyzed,
            })
            .collect();
        // Stale-first so the longest-unanalyzed users go to the front
        pending.sort_by_key(|p| p.last_analyzed_at);
        Ok(pending
            .into_iter()
            .take(limit)
            .map(|p| (p.user_id.clone(), p.username.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn message(id: &str, user_id: &str, channel_id: &str, minutes_ago: i64) -> MessageSample {
        MessageSample {
            id: id.to_string(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
            sender_kind: SenderKind::Human,
            user_id: user_id.to_string(),
            username: format!("user-{user_id}"),
            channel_id: channel_id.to_string(),
            content: "hello there".to_string(),
            sentiment: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_is_newest_first_and_limited() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store.insert_message(message(&format!("m{i}"), "u-1", "c-1", i)).await;
        }

        let hits = store
            .fetch_messages(&MessageQuery::for_user("u-1", 3))
            .await
            .unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, "m0"); // newest
        assert!(hits[0].timestamp > hits[2].timestamp);
    }

    #[tokio::test]
    async fn test_channel_query_spans_senders() {
        let store = InMemoryStore::new();
        store.insert_message(message("m1", "u-1", "c-1", 2)).await;
        let mut bot = message("m2", "bot", "c-1", 1);
        bot.sender_kind = SenderKind::Assistant;
        store.insert_message(bot).await;

        let hits = store
            .fetch_messages(&MessageQuery::for_channel("c-1", 10))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_tracks_profile_bookkeeping() {
        let store = InMemoryStore::new();
        store.insert_message(message("m1", "u-1", "c-1", 10)).await;
        store.insert_message(message("m2", "u-1", "c-1", 1)).await;

        let profile = store.get_profile("u-1").await.unwrap().unwrap();
        assert_eq!(profile.message_count, 2);
        assert!(profile.last_interaction_at > profile.first_seen_at);
        assert!(profile.last_analyzed_at.is_none());
    }

    #[tokio::test]
    async fn test_pending_users_excludes_analyzed() {
        let store = InMemoryStore::new();
        store.insert_message(message("m1", "u-1", "c-1", 5)).await;
        store.insert_message(message("m2", "u-2", "c-1", 5)).await;

        let pending = store.users_pending_analysis(10).await.unwrap();
        assert_eq!(pending.len(), 2);

        // Mark u-1 analyzed after its last interaction
        {
            let mut profiles = store.profiles.write().await;
            profiles.get_mut("u-1").unwrap().last_analyzed_at = Some(Utc::now());
        }
        let pending = store.users_pending_analysis(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0, "u-2");
    }

    #[tokio::test]
    async fn test_unknown_user_defaults() {
        let store = InMemoryStore::new();
        let count = store.count_messages("ghost", SenderKind::Human).await.unwrap();
        assert_eq!(count, 0);
        assert!(store.get_profile("ghost").await.unwrap().is_none());
    }
}
