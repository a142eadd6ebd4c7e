//! Batch re-analysis of many responses against one engine.
//!
//! Scoring is CPU-bound and independent per response, so each response runs on
//! a blocking worker. A semaphore caps how many run at once; results come back
//! in the order the responses were given.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::model::{EndingId, QuizResponse};
use crate::result::AnalysisResult;
use crate::statistics::{compute_ending_stats, EndingStats};
use crate::validation::ValidatedEngine;

/// Configuration for the batch runner.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum concurrent analyses.
    pub parallelism: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_analysis_complete(&self, index: usize, result: &AnalysisResult);
    fn on_analysis_error(&self, index: usize, error: &str);
    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_analysis_complete(&self, _: usize, _: &AnalysisResult) {}
    fn on_analysis_error(&self, _: usize, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// The output of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the batch finished.
    pub created_at: DateTime<Utc>,
    pub engine_id: String,
    pub engine_version: u32,
    /// One result per successful analysis, in input order. Responses whose
    /// analysis failed are left out and listed in `failed`.
    pub results: Vec<AnalysisResult>,
    /// Input indices of the responses whose analysis failed.
    #[serde(default)]
    pub failed: Vec<usize>,
    /// Per-ending aggregate over all results.
    pub aggregate: BTreeMap<EndingId, EndingStats>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize batch report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write batch report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read batch report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse batch report JSON")
    }
}

/// Runs one engine over many responses concurrently.
pub struct BatchAnalyzer {
    engine: Arc<ValidatedEngine>,
    config: BatchConfig,
}

impl BatchAnalyzer {
    pub fn new(engine: Arc<ValidatedEngine>, config: BatchConfig) -> Self {
        Self { engine, config }
    }

    /// Analyze every response, returning results in input order. Failed
    /// analyses are dropped from `results` and their indices recorded.
    pub async fn run(
        &self,
        responses: Vec<QuizResponse>,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchReport> {
        anyhow::ensure!(self.config.parallelism >= 1, "parallelism must be at least 1");

        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let total = responses.len();

        tracing::info!(
            run = %run_id,
            engine = %self.engine.id,
            "analyzing {total} responses with parallelism {}",
            self.config.parallelism
        );

        let mut futures = FuturesUnordered::new();
        for (index, response) in responses.into_iter().enumerate() {
            let engine = Arc::clone(&self.engine);
            let semaphore = Arc::clone(&semaphore);

            futures.push(async move {
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    let result = tokio::task::spawn_blocking(move || engine.analyze(&response))
                        .await
                        .context("analysis task panicked")?;
                    Ok::<_, anyhow::Error>(result)
                };
                (index, inner.await)
            });
        }

        let mut slots: Vec<Option<AnalysisResult>> = vec![None; total];
        let mut completed = 0usize;
        let mut failed = 0usize;

        while let Some((index, outcome)) = futures.next().await {
            match outcome {
                Ok(result) => {
                    progress.on_analysis_complete(index, &result);
                    slots[index] = Some(result);
                    completed += 1;
                }
                Err(e) => {
                    tracing::error!("analysis {index} failed: {e:#}");
                    progress.on_analysis_error(index, &e.to_string());
                    failed += 1;
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, completed, failed, elapsed);

        let (results, failed_indices) = split_slots(slots);
        let aggregate = compute_ending_stats(&results);

        Ok(BatchReport {
            id: run_id,
            created_at: Utc::now(),
            engine_id: self.engine.id.clone(),
            engine_version: self.engine.version,
            results,
            failed: failed_indices,
            aggregate,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Separate filled slots from the indices of empty ones, keeping input order.
fn split_slots(slots: Vec<Option<AnalysisResult>>) -> (Vec<AnalysisResult>, Vec<usize>) {
    let mut results = Vec::with_capacity(slots.len());
    let mut failed = Vec::new();
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(result) => results.push(result),
            None => failed.push(index),
        }
    }
    (results, failed)
}
