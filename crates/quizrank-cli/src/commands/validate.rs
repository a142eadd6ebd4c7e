//! The `quizrank validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrank_core::parser;
use quizrank_core::validation::{check_engine_against_quiz, validate_engine, validate_quiz};

pub fn execute(engine_path: PathBuf, quiz_path: Option<PathBuf>) -> Result<()> {
    let engine = parser::parse_engine(&engine_path)?;
    let rule_count: usize = engine.endings.iter().map(|e| e.rules.len()).sum();
    println!(
        "Engine: {} v{} ({} endings, {} rules)",
        engine.id,
        engine.version,
        engine.endings.len(),
        rule_count
    );

    let mut warnings = Vec::new();
    if let Some(quiz_path) = &quiz_path {
        let quiz = parser::parse_quiz(quiz_path)?;
        println!("Quiz: {} ({} questions)", quiz.id, quiz.questions.len());
        warnings.extend(validate_quiz(&quiz));
        warnings.extend(check_engine_against_quiz(&engine, &quiz));
    }

    for w in &warnings {
        let prefix = w
            .ending_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    let errors = validate_engine(&engine);
    for e in &errors {
        println!("  ERROR: {e}");
    }

    anyhow::ensure!(
        errors.is_empty(),
        "engine '{}' has {} configuration error(s)",
        engine.id,
        errors.len()
    );

    if warnings.is_empty() {
        println!("Engine valid.");
    } else {
        println!("\nEngine valid with {} warning(s).", warnings.len());
    }

    Ok(())
}
