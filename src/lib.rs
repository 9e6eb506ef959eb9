//! Ethos - Longitudinal Behavioral Profiling for Chat Communities
//!
//! A Rust inference engine that maintains an evolving behavioral and
//! psychometric profile for each participant in a chat community:
//! - Deterministic linguistic feature scoring (personality proxies,
//!   cognitive style, social dynamics, behavioral metrics)
//! - Rule-based classification (attachment style, emotional bond stage)
//! - LLM-assisted subjective assessment with a deterministic fallback
//! - Versioned, diffable analysis history
//! - Batch scheduling across users with pacing and failure isolation
//!
//! # Architecture
//!
//! The crate is organized into several layers:
//! - **Types**: Core data structures (MessageSample, UserProfile, etc.)
//! - **Storage**: The `ProfileStore` capability the host supplies
//! - **Services**: LLM integration for subjective assessments
//! - **Analysis**: Collector, scorers, classifiers, and the pipeline
//! - **Scheduler**: Batch analysis over users with advanced activity
//!
//! # Example
//!
//! ```ignore
//! use ethos::{AnalysisConfig, BatchScheduler, InMemoryStore, ProfileAnalyzer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(InMemoryStore::new());
//!     let analyzer = ProfileAnalyzer::new(store.clone(), None, AnalysisConfig::default());
//!
//!     // Analyze one user on demand
//!     analyzer.analyze_user("u-1041", "marisol").await?;
//!
//!     // Or sweep everyone whose activity has advanced
//!     let scheduler = BatchScheduler::new(Arc::new(analyzer), store);
//!     let report = scheduler.run_batch(50).await?;
//!     println!("analyzed {} users", report.analyzed);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod scheduler;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use analysis::analyzer::{AnalysisOutcome, ProfileAnalyzer};
pub use config::{AnalysisConfig, LlmConfig};
pub use error::{EthosError, Result};
pub use scheduler::{BatchReport, BatchScheduler};
pub use services::{AnthropicClient, LanguageModel};
pub use storage::{memory::InMemoryStore, MessageQuery, ProfileStore};
pub use types::{
    AnalysisHistoryEntry, BondStage, InteractionPatterns, MessageSample, PersonalityFacets,
    ProfileUpdate, SenderKind, SentimentAnnotation, SentimentLabel, UserFeelings, UserProfile,
};
