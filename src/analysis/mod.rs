//! Analysis pipeline for the Ethos profiling engine
//!
//! The pipeline for one user runs collector → deterministic scorers →
//! classifier heuristics → subjective assessment → change detection →
//! profile write. Scorers and classifiers are pure synchronous functions;
//! only collection, the LLM call, and the writes suspend.

pub mod analyzer;
pub mod change;
pub mod classifiers;
pub mod collector;
pub mod scorers;
pub mod subjective;

pub use analyzer::{AnalysisOutcome, ProfileAnalyzer};
pub use collector::{DataCollector, UserAnalysisData};
