//! The `quizrank analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizrank_core::parser;
use quizrank_core::scorer::{explain, EndingBreakdown};
use quizrank_core::validation::check_response_against_quiz;
use quizrank_core::AnalysisResult;

pub fn execute(
    engine_path: PathBuf,
    response_path: PathBuf,
    quiz_path: Option<PathBuf>,
    show_breakdown: bool,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let engine = super::load_engine(&engine_path)?;
    let response = parser::parse_response(&response_path)?;

    if let Some(quiz_path) = &quiz_path {
        let quiz = parser::parse_quiz(quiz_path)?;
        for w in check_response_against_quiz(&response, &quiz) {
            eprintln!("WARNING: {}", w.message);
        }
    }

    let result = engine.analyze(&response);
    let breakdown = show_breakdown.then(|| explain(&engine, &response));

    match format.as_str() {
        "json" => {
            let value = match &breakdown {
                Some(b) => serde_json::json!({ "result": &result, "breakdown": b }),
                None => serde_json::to_value(&result)?,
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => {
            println!(
                "Engine: {} v{} ({} endings)",
                engine.id,
                engine.version,
                engine.endings.len()
            );
            if let Some(id) = &result.response_id {
                println!("Response: {id}");
            }
            println!("{}", result_table(&result));
            if let Some(b) = &breakdown {
                print_breakdown(b);
            }
        }
    }

    if let Some(path) = output {
        result.save_json(&path)?;
        eprintln!("Result saved to: {}", path.display());
    }

    Ok(())
}

fn result_table(result: &AnalysisResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Ending", "Name", "Points", "Percentage"]);
    for r in &result.ending_results {
        table.add_row(vec![
            Cell::new(r.rank),
            Cell::new(&r.ending_id),
            Cell::new(&r.display_name),
            Cell::new(format!("{:.2}", r.points)),
            Cell::new(format!("{:.1}%", r.percentage)),
        ]);
    }
    table
}

fn print_breakdown(breakdown: &[EndingBreakdown]) {
    for ending in breakdown {
        println!("\n{} (total {:.3})", ending.ending_id, ending.total);
        if ending.rules.is_empty() {
            println!("  (no rules)");
        }
        for rule in &ending.rules {
            let tier = if rule.is_primary { "primary" } else { "secondary" };
            match (rule.answer, rule.distance) {
                (Some(answer), Some(distance)) => println!(
                    "  {} [{tier}] answer {answer} distance {distance} retain {:.3} -> {:+.3}",
                    rule.question_id, rule.retain, rule.contribution
                ),
                _ => println!("  {} [{tier}] unanswered -> 0", rule.question_id),
            }
        }
    }
}
