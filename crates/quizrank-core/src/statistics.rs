//! Aggregate statistics over many analysis results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::EndingId;
use crate::result::AnalysisResult;

/// How one ending fared across a set of analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingStats {
    /// Ending identifier.
    pub ending_id: EndingId,
    /// Number of analyses where this ending ranked first.
    pub times_top: usize,
    /// `times_top` as a fraction of all analyses.
    pub top_share: f64,
    /// Mean percentage across all analyses.
    pub mean_percentage: f64,
    /// Mean raw points across all analyses.
    pub mean_points: f64,
}

/// Compute per-ending statistics from a batch of results.
pub fn compute_ending_stats(results: &[AnalysisResult]) -> BTreeMap<EndingId, EndingStats> {
    #[derive(Default)]
    struct Acc {
        times_top: usize,
        percentage_sum: f64,
        points_sum: f64,
        seen: usize,
    }

    let mut acc: BTreeMap<EndingId, Acc> = BTreeMap::new();
    for result in results {
        for r in &result.ending_results {
            let entry = acc.entry(r.ending_id.clone()).or_default();
            entry.percentage_sum += r.percentage;
            entry.points_sum += r.points;
            entry.seen += 1;
        }
        if let Some(top) = result.top() {
            acc.entry(top.ending_id.clone()).or_default().times_top += 1;
        }
    }

    let total = results.len().max(1) as f64;
    acc.into_iter()
        .map(|(ending_id, a)| {
            let seen = a.seen.max(1) as f64;
            let stats = EndingStats {
                ending_id: ending_id.clone(),
                times_top: a.times_top,
                top_share: a.times_top as f64 / total,
                mean_percentage: a.percentage_sum / seen,
                mean_points: a.points_sum / seen,
            };
            (ending_id, stats)
        })
        .collect()
}
