//! The `quizrank batch` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use quizrank_core::batch::{BatchAnalyzer, BatchConfig, BatchReport, ProgressReporter};
use quizrank_core::parser;
use quizrank_core::AnalysisResult;

use crate::settings::load_config_from;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_analysis_complete(&self, index: usize, result: &AnalysisResult) {
        let top = result
            .top()
            .map(|t| format!("{} ({:.1}%)", t.ending_id, t.percentage))
            .unwrap_or_else(|| "-".into());
        eprintln!(
            "  Done: #{} {} -> {}",
            index + 1,
            result.response_id.as_deref().unwrap_or(""),
            top
        );
    }

    fn on_analysis_error(&self, index: usize, error: &str) {
        eprintln!("  ERROR: #{}: {error}", index + 1);
    }

    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} analyzed, {failed} failed ({:.2}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    engine_path: PathBuf,
    responses_path: PathBuf,
    parallelism: Option<usize>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = output.unwrap_or(config.output_dir);

    let engine = Arc::new(super::load_engine(&engine_path)?);
    let responses = if responses_path.is_dir() {
        parser::load_response_directory(&responses_path)?
    } else {
        parser::parse_responses(&responses_path)?
    };

    eprintln!(
        "quizrank v{}: analyzing {} responses against {} v{}",
        env!("CARGO_PKG_VERSION"),
        responses.len(),
        engine.id,
        engine.version
    );
    eprintln!();

    let analyzer = BatchAnalyzer::new(engine, BatchConfig { parallelism });
    let report = analyzer.run(responses, &ConsoleReporter).await?;

    print_summary(&report);

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("batch-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &BatchReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Ending", "Top Count", "Top Share", "Mean %", "Mean Points"]);

    let mut stats: Vec<_> = report.aggregate.values().collect();
    stats.sort_by(|a, b| b.times_top.cmp(&a.times_top).then_with(|| a.ending_id.cmp(&b.ending_id)));

    for s in stats {
        table.add_row(vec![
            Cell::new(&s.ending_id),
            Cell::new(s.times_top),
            Cell::new(format!("{:.1}%", s.top_share * 100.0)),
            Cell::new(format!("{:.1}%", s.mean_percentage)),
            Cell::new(format!("{:.2}", s.mean_points)),
        ]);
    }

    println!("{table}");
}
