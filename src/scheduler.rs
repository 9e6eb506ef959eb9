//! Batch analysis scheduler
//!
//! Sweeps users whose interaction history has advanced since their last
//! analysis, running the pipeline one user at a time. Per-user failures
//! are logged and skipped (no retry within the batch); a fixed pacing
//! delay between users bounds the outbound call rate to the language
//! model provider.

use crate::analysis::analyzer::{AnalysisOutcome, ProfileAnalyzer};
use crate::error::{EthosError, Result};
use crate::storage::ProfileStore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info};

/// Report produced by one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Users pulled from the pending queue
    pub scanned: usize,

    /// Users whose profile was updated
    pub analyzed: usize,

    /// Users skipped below the message threshold
    pub skipped: usize,

    /// Users whose run failed (logged, not retried)
    pub failed: usize,
}

/// Sequential batch runner over pending users
pub struct BatchScheduler {
    analyzer: Arc<ProfileAnalyzer>,
    store: Arc<dyn ProfileStore>,
    running: AtomicBool,
}

impl BatchScheduler {
    pub fn new(analyzer: Arc<ProfileAnalyzer>, store: Arc<dyn ProfileStore>) -> Self {
        Self {
            analyzer,
            store,
            running: AtomicBool::new(false),
        }
    }

    /// Run the pipeline for up to `limit` pending users
    ///
    /// Terminal when the queue is exhausted. Only one batch may run at a
    /// time per scheduler instance.
    pub async fn run_batch(&self, limit: usize) -> Result<BatchReport> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(EthosError::Other("batch already running".to_string()));
        }
        let report = self.run_batch_inner(limit).await;
        self.running.store(false, Ordering::SeqCst);
        report
    }

    async fn run_batch_inner(&self, limit: usize) -> Result<BatchReport> {
        let pending = self.store.users_pending_analysis(limit).await?;
        info!(pending = pending.len(), limit, "starting batch analysis");

        let pacing = self.analyzer.config().pacing_delay;
        let mut report = BatchReport {
            scanned: pending.len(),
            analyzed: 0,
            skipped: 0,
            failed: 0,
        };

        for (index, (user_id, username)) in pending.iter().enumerate() {
            if index > 0 {
                // Backpressure against the model provider, not a
                // correctness requirement
                sleep(pacing).await;
            }

            match self.analyzer.analyze_user(user_id, username).await {
                Ok(AnalysisOutcome::Updated) => report.analyzed += 1,
                Ok(AnalysisOutcome::SkippedBelowThreshold) => report.skipped += 1,
                Err(e) => {
                    error!(user_id, error = %e, "batch item failed; continuing");
                    report.failed += 1;
                }
            }
        }

        info!(
            analyzed = report.analyzed,
            skipped = report.skipped,
            failed = report.failed,
            "batch analysis complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::storage::MockProfileStore;

    #[tokio::test]
    async fn test_pending_query_failure_propagates() {
        let mut mock = MockProfileStore::new();
        mock.expect_users_pending_analysis()
            .returning(|_| Err(EthosError::Store("queue table missing".to_string())));

        let store: Arc<dyn ProfileStore> = Arc::new(mock);
        let analyzer = Arc::new(ProfileAnalyzer::new(
            store.clone(),
            None,
            AnalysisConfig::default(),
        ));
        let scheduler = BatchScheduler::new(analyzer, store);

        let result = scheduler.run_batch(5).await;
        assert!(matches!(result, Err(EthosError::Store(_))));
        // A failed batch releases the running guard
        assert!(!scheduler.running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_report_serialization() {
        let report = BatchReport {
            scanned: 4,
            analyzed: 2,
            skipped: 1,
            failed: 1,
        };
        let json = serde_json::to_string(&report).unwrap();
        let decoded: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.analyzed, 2);
        assert_eq!(decoded.failed, 1);
    }
}
