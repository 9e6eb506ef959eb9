//! Services layer for the Ethos profiling engine
//!
//! Provides the language-model capability used by the subjective
//! assessment stage.

pub mod llm;

pub use llm::{AnthropicClient, LanguageModel};
