//! Definition file loading.
//!
//! Engines and quizzes are authored as TOML; responses arrive as JSON, either
//! one object per file or an array of objects.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::ScoringConfig;
use crate::model::{
    AnswerDomain, EndingDefinition, EngineDefinition, Question, QuestionRule, Quiz, QuizResponse,
};

/// Intermediate TOML structure for engine definition files.
#[derive(Debug, Deserialize)]
struct TomlEngineFile {
    engine: TomlEngineHeader,
    #[serde(default)]
    config: ScoringConfig,
    #[serde(default)]
    endings: Vec<TomlEnding>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlEngineHeader {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_version")]
    version: u32,
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlEnding {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    rules: Vec<TomlRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRule {
    question: String,
    ideal: Vec<f64>,
    #[serde(default)]
    primary: bool,
}

/// Intermediate TOML structure for quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlQuizHeader {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default = "default_min")]
    min: i64,
    #[serde(default = "default_max")]
    max: i64,
}

fn default_min() -> i64 {
    1
}

fn default_max() -> i64 {
    10
}

/// Parse a TOML engine definition file.
pub fn parse_engine(path: &Path) -> Result<EngineDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read engine file: {}", path.display()))?;

    parse_engine_str(&content, path)
}

/// Parse a TOML string into an `EngineDefinition` (useful for testing).
pub fn parse_engine_str(content: &str, source_path: &Path) -> Result<EngineDefinition> {
    let parsed: TomlEngineFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let endings = parsed
        .endings
        .into_iter()
        .map(|e| EndingDefinition {
            id: e.id.into(),
            display_name: e.name,
            rules: e
                .rules
                .into_iter()
                .map(|r| QuestionRule::new(r.question, r.ideal, r.primary))
                .collect(),
        })
        .collect();

    Ok(EngineDefinition {
        id: parsed.engine.id,
        name: parsed.engine.name,
        version: parsed.engine.version,
        endings,
        config: parsed.config,
    })
}

/// Parse a TOML quiz file.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `Quiz`.
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(Quiz {
        id: parsed.quiz.id,
        title: parsed.quiz.title,
        questions: parsed
            .questions
            .into_iter()
            .map(|q| Question {
                id: q.id.into(),
                text: q.text,
                domain: AnswerDomain::new(q.min, q.max),
            })
            .collect(),
    })
}

/// Load a single JSON response.
pub fn parse_response(path: &Path) -> Result<QuizResponse> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read response file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse response JSON: {}", path.display()))
}

/// Load responses from a JSON file holding either one response or an array.
pub fn parse_responses(path: &Path) -> Result<Vec<QuizResponse>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read response file: {}", path.display()))?;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<QuizResponse>),
        One(QuizResponse),
    }

    let parsed: OneOrMany = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse response JSON: {}", path.display()))?;
    Ok(match parsed {
        OneOrMany::Many(v) => v,
        OneOrMany::One(r) => vec![r],
    })
}

/// Load every `.json` response file in a directory, sorted by file name.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_response_directory(dir: &Path) -> Result<Vec<QuizResponse>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut responses = Vec::new();
    for path in paths {
        match parse_responses(&path) {
            Ok(mut batch) => {
                // A file name stands in for a missing id on single responses.
                if batch.len() == 1 && batch[0].id.is_none() {
                    batch[0].id = path.file_stem().map(|s| s.to_string_lossy().into_owned());
                }
                responses.extend(batch);
            }
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(responses)
}
