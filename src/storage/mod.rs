//! Storage layer for the Ethos profiling engine
//!
//! Provides the `ProfileStore` abstraction over the host's Message Store:
//! message reads, profile upserts, and append-only history writes. The
//! engine never owns persistence; hosts supply a backend and the crate
//! ships an in-memory implementation for tests and embedding.

pub mod memory;

use crate::error::Result;
use crate::types::{
    AnalysisHistoryEntry, MessageSample, ProfileUpdate, SenderKind, UserProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

/// Filter tuple for message reads
///
/// All fields are optional except the limit; unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    /// Restrict to one sender's messages
    pub user_id: Option<String>,

    /// Restrict to one channel
    pub channel_id: Option<String>,

    /// Restrict by sender kind
    pub sender_kind: Option<SenderKind>,

    /// Only messages strictly after this instant
    pub after: Option<DateTime<Utc>>,

    /// Only messages strictly before this instant
    pub before: Option<DateTime<Utc>>,

    /// Maximum number of messages to return
    pub limit: usize,
}

impl MessageQuery {
    /// A user's own human messages, newest first
    pub fn for_user(user_id: &str, limit: usize) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            sender_kind: Some(SenderKind::Human),
            limit,
            ..Default::default()
        }
    }

    /// Full channel traffic (all sender kinds), newest first
    pub fn for_channel(channel_id: &str, limit: usize) -> Self {
        Self {
            channel_id: Some(channel_id.to_string()),
            limit,
            ..Default::default()
        }
    }
}

/// Storage backend trait defining all required operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch messages matching a query, newest first
    async fn fetch_messages(&self, query: &MessageQuery) -> Result<Vec<MessageSample>>;

    /// Total historical message count for a user (not just a window)
    async fn count_messages(&self, user_id: &str, sender_kind: SenderKind) -> Result<u64>;

    /// Load a user's profile, if one exists
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Load the profile, creating a first-contact row if absent
    async fn ensure_profile(&self, user_id: &str, username: &str) -> Result<UserProfile>;

    /// Merge one analysis run's output into the profile row
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()>;

    /// Append one history entry; entries are write-once
    async fn append_history(&self, entry: &AnalysisHistoryEntry) -> Result<()>;

    /// A user's history, newest first
    async fn history_for(&self, user_id: &str, limit: usize) -> Result<Vec<AnalysisHistoryEntry>>;

    /// Users whose `last_interaction_at` has advanced past their
    /// `last_analyzed_at` (or who were never analyzed), as (user_id,
    /// username) pairs, up to `limit`
    async fn users_pending_analysis(&self, limit: usize) -> Result<Vec<(String, String)>>;
}
