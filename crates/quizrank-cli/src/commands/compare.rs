//! The `quizrank compare` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrank_core::AnalysisResult;

use crate::settings::load_config_from;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: Option<f64>,
    fail_on_shift: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let threshold = match threshold {
        Some(t) => t,
        None => load_config_from(config_path.as_deref())?.shift_threshold,
    };
    anyhow::ensure!(threshold >= 0.0, "threshold must be non-negative");

    let baseline = AnalysisResult::load_json(&baseline_path)?;
    let current = AnalysisResult::load_json(&current_path)?;

    if baseline.engine_id != current.engine_id {
        tracing::warn!(
            "comparing results from different engines: {} vs {}",
            baseline.engine_id,
            current.engine_id
        );
    }

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            let top = |id: &Option<quizrank_core::EndingId>| {
                id.as_ref().map(|e| e.to_string()).unwrap_or_else(|| "-".into())
            };
            println!(
                "Top ending: {} -> {}{}",
                top(&report.baseline_top),
                top(&report.current_top),
                if report.top_changed() { " (changed)" } else { "" }
            );
            println!(
                "Comparison: {} shifted, {} unchanged",
                report.shifts.len(),
                report.unchanged
            );

            if !report.shifts.is_empty() {
                println!("\nShifts:");
                for s in &report.shifts {
                    println!(
                        "  {} {:.1}% -> {:.1}% ({:+.1})",
                        s.ending_id, s.baseline_percentage, s.current_percentage, s.delta
                    );
                }
            }

            if !report.new_endings.is_empty() {
                println!("\n{} new ending(s)", report.new_endings.len());
            }
            if !report.removed_endings.is_empty() {
                println!("{} removed ending(s)", report.removed_endings.len());
            }
        }
    }

    if fail_on_shift && report.has_shifts() {
        std::process::exit(1);
    }

    Ok(())
}
