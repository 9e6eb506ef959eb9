//! Data collection for one user's analysis run
//!
//! Fetches the user's recent message window plus a bounded sample of full
//! channel traffic from their most active channels, and computes the
//! transient interaction aggregates every later stage reads.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::storage::{MessageQuery, ProfileStore};
use crate::types::{InteractionPatterns, MessageSample, SenderKind};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything one analysis run observes about a user
///
/// `messages` holds the user's own human messages, newest first.
/// `context_messages` holds deduplicated surrounding channel traffic
/// (all sender kinds) for the subjective stage. Both windows are bounded;
/// `total_message_count` is the user's full historical count.
#[derive(Debug, Clone)]
pub struct UserAnalysisData {
    pub user_id: String,
    pub username: String,
    pub messages: Vec<MessageSample>,
    pub context_messages: Vec<MessageSample>,
    pub patterns: InteractionPatterns,
    pub total_message_count: u64,
    pub first_message_at: Option<DateTime<Utc>>,
    pub last_message_at: Option<DateTime<Utc>>,
}

impl UserAnalysisData {
    /// Days spanned by the fetched window, at least one
    pub fn window_days(&self) -> i64 {
        match (self.first_message_at, self.last_message_at) {
            (Some(first), Some(last)) => (last - first).num_days().max(1),
            _ => 1,
        }
    }
}

/// Fetches and aggregates a user's message history
pub struct DataCollector {
    store: Arc<dyn ProfileStore>,
    config: AnalysisConfig,
}

impl DataCollector {
    pub fn new(store: Arc<dyn ProfileStore>, config: AnalysisConfig) -> Self {
        Self { store, config }
    }

    /// Collect one user's analysis window
    ///
    /// Pure read; store errors on the user's own window propagate (fatal
    /// for this run), while a failed channel-context fetch degrades to
    /// fewer context lines.
    pub async fn collect(&self, user_id: &str, username: &str) -> Result<UserAnalysisData> {
        let messages = self
            .store
            .fetch_messages(&MessageQuery::for_user(
                user_id,
                self.config.max_messages_to_fetch,
            ))
            .await?;
        let total_message_count = self.store.count_messages(user_id, SenderKind::Human).await?;

        debug!(
            user_id,
            window = messages.len(),
            total = total_message_count,
            "collected user message window"
        );

        let context_messages = self.collect_channel_context(user_id, &messages).await;
        let patterns = InteractionPatterns::from_messages(&messages);

        // Window arrives newest-first
        let last_message_at = messages.first().map(|m| m.timestamp);
        let first_message_at = messages.last().map(|m| m.timestamp);

        Ok(UserAnalysisData {
            user_id: user_id.to_string(),
            username: username.to_string(),
            messages,
            context_messages,
            patterns,
            total_message_count,
            first_message_at,
            last_message_at,
        })
    }

    /// Sample full traffic from the user's most active channels,
    /// deduplicated against the user's own window
    async fn collect_channel_context(
        &self,
        user_id: &str,
        messages: &[MessageSample],
    ) -> Vec<MessageSample> {
        let mut seen: HashSet<String> = messages.iter().map(|m| m.id.clone()).collect();
        let mut context = Vec::new();

        for channel_id in most_active_channels(messages, self.config.context_channels) {
            let query = MessageQuery::for_channel(&channel_id, self.config.channel_context_limit);
            match self.store.fetch_messages(&query).await {
                Ok(channel_messages) => {
                    for message in channel_messages {
                        if seen.insert(message.id.clone()) {
                            context.push(message);
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        user_id,
                        channel_id,
                        error = %e,
                        "channel context fetch failed; continuing with fewer context lines"
                    );
                }
            }
        }

        context
    }
}

/// The user's top channels by message frequency in the window
fn most_active_channels(messages: &[MessageSample], take: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for message in messages {
        *counts.entry(message.channel_id.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(take)
        .map(|(channel, _)| channel.to_string())
        .collect()
}
