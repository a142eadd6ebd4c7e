//! Analysis result types with JSON persistence and shift detection.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EndingId, EngineDefinition, QuizResponse};

/// One ending's place in an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingResult {
    pub ending_id: EndingId,
    #[serde(default)]
    pub display_name: String,
    /// Raw, unnormalized points.
    pub points: f64,
    /// Share of the distribution, 0-100.
    pub percentage: f64,
    /// 1-based position in the ranking.
    pub rank: usize,
}

/// The outcome of analyzing one response against one engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Unique result identifier.
    pub id: Uuid,
    /// Engine that produced the result.
    pub engine_id: String,
    /// Version of that engine.
    pub engine_version: u32,
    /// Response that was analyzed, if it carried an id.
    #[serde(default)]
    pub response_id: Option<String>,
    /// Endings in rank order.
    pub ending_results: Vec<EndingResult>,
    /// When the analysis ran.
    pub computed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub(crate) fn new(
        engine: &EngineDefinition,
        response: &QuizResponse,
        ending_results: Vec<EndingResult>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine_id: engine.id.clone(),
            engine_version: engine.version,
            response_id: response.id.clone(),
            ending_results,
            computed_at: Utc::now(),
        }
    }

    /// The highest-ranked ending.
    pub fn top(&self) -> Option<&EndingResult> {
        self.ending_results.first()
    }

    pub fn get(&self, ending_id: &EndingId) -> Option<&EndingResult> {
        self.ending_results.iter().find(|r| &r.ending_id == ending_id)
    }

    /// Sum of all percentages; 100 for any non-empty result.
    pub fn percentage_total(&self) -> f64 {
        self.ending_results.iter().map(|r| r.percentage).sum()
    }

    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: AnalysisResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }

    /// Compare this result against a baseline, reporting endings whose
    /// percentage moved by more than `threshold` percentage points.
    pub fn compare(&self, baseline: &AnalysisResult, threshold: f64) -> ShiftReport {
        let percentages = |result: &AnalysisResult| -> BTreeMap<EndingId, f64> {
            result
                .ending_results
                .iter()
                .map(|r| (r.ending_id.clone(), r.percentage))
                .collect()
        };

        let baseline_pct = percentages(baseline);
        let current_pct = percentages(self);

        let mut shifts = Vec::new();
        let mut unchanged = 0usize;
        let mut new_endings = Vec::new();

        for (ending_id, &current) in &current_pct {
            match baseline_pct.get(ending_id) {
                Some(&before) => {
                    let delta = current - before;
                    if delta.abs() > threshold {
                        shifts.push(EndingShift {
                            ending_id: ending_id.clone(),
                            baseline_percentage: before,
                            current_percentage: current,
                            delta,
                        });
                    } else {
                        unchanged += 1;
                    }
                }
                None => new_endings.push(ending_id.clone()),
            }
        }

        let removed_endings = baseline_pct
            .keys()
            .filter(|k| !current_pct.contains_key(k))
            .cloned()
            .collect();

        shifts.sort_by(|a, b| {
            b.delta
                .abs()
                .partial_cmp(&a.delta.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.ending_id.cmp(&b.ending_id))
        });

        ShiftReport {
            baseline_top: baseline.top().map(|r| r.ending_id.clone()),
            current_top: self.top().map(|r| r.ending_id.clone()),
            shifts,
            unchanged,
            new_endings,
            removed_endings,
        }
    }
}

/// Result of comparing two analyses of the same response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftReport {
    pub baseline_top: Option<EndingId>,
    pub current_top: Option<EndingId>,
    /// Endings that moved by more than the threshold, largest move first.
    pub shifts: Vec<EndingShift>,
    /// Endings within the threshold.
    pub unchanged: usize,
    /// Endings in current but not baseline.
    pub new_endings: Vec<EndingId>,
    /// Endings in baseline but not current.
    pub removed_endings: Vec<EndingId>,
}

/// A single ending's percentage movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndingShift {
    pub ending_id: EndingId,
    pub baseline_percentage: f64,
    pub current_percentage: f64,
    pub delta: f64,
}

impl ShiftReport {
    /// Whether the top-ranked ending is different.
    pub fn top_changed(&self) -> bool {
        self.baseline_top != self.current_top
    }

    /// Whether anything moved past the threshold or the top ending changed.
    pub fn has_shifts(&self) -> bool {
        self.top_changed() || !self.shifts.is_empty()
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        let top = |id: &Option<EndingId>| id.as_ref().map(|e| e.to_string()).unwrap_or_else(|| "-".into());
        md.push_str(&format!(
            "**Top ending:** {} -> {}{}\n\n",
            top(&self.baseline_top),
            top(&self.current_top),
            if self.top_changed() { " (changed)" } else { "" }
        ));
        md.push_str(&format!(
            "**Summary:** {} shifted, {} unchanged\n\n",
            self.shifts.len(),
            self.unchanged
        ));

        if !self.shifts.is_empty() {
            md.push_str("| Ending | Baseline | Current | Delta |\n");
            md.push_str("|--------|----------|---------|-------|\n");
            for s in &self.shifts {
                md.push_str(&format!(
                    "| {} | {:.1}% | {:.1}% | {:+.1} |\n",
                    s.ending_id, s.baseline_percentage, s.current_percentage, s.delta
                ));
            }
            md.push('\n');
        }

        if !self.new_endings.is_empty() {
            let ids: Vec<String> = self.new_endings.iter().map(|e| e.to_string()).collect();
            md.push_str(&format!("New endings: {}\n", ids.join(", ")));
        }
        if !self.removed_endings.is_empty() {
            let ids: Vec<String> = self.removed_endings.iter().map(|e| e.to_string()).collect();
            md.push_str(&format!("Removed endings: {}\n", ids.join(", ")));
        }

        md
    }
}
