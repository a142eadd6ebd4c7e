//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizrank() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizrank").unwrap()
}

const ENGINE: &str = r#"
[engine]
id = "two-endings"
name = "Two Endings"
version = 2

[config]
primary_point_value = 10
primary_point_weight = 1
primary_distance_falloff = 0.1
beta = 1

[[endings]]
id = "A"
name = "Ending A"

[[endings.rules]]
question = "Q1"
ideal = [8]
primary = true

[[endings]]
id = "B"
name = "Ending B"

[[endings.rules]]
question = "Q1"
ideal = [2]
primary = true
"#;

const QUIZ: &str = r#"
[quiz]
id = "quiz"

[[questions]]
id = "Q1"
min = 1
max = 10
"#;

const BAD_ENGINE: &str = r#"
[engine]
id = "broken"

[config]
beta = 0
primary_distance_falloff = 2.0

[[endings]]
id = "A"

[[endings.rules]]
question = "Q1"
ideal = []

[[endings]]
id = "A"
"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn analyze_prints_ranked_table() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", ENGINE);
    let response = write(dir.path(), "r.json", r#"{"id": "r1", "answers": {"Q1": 8}}"#);

    quizrank()
        .arg("analyze")
        .arg("--engine")
        .arg(&engine)
        .arg("--response")
        .arg(&response)
        .assert()
        .success()
        .stdout(predicate::str::contains("two-endings v2"))
        .stdout(predicate::str::contains("Ending A"))
        .stdout(predicate::str::contains("65.3%"))
        .stdout(predicate::str::contains("34.7%"));
}

#[test]
fn analyze_json_output_and_save() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", ENGINE);
    let response = write(dir.path(), "r.json", r#"{"answers": {"Q1": 8}}"#);
    let out = dir.path().join("out").join("result.json");

    let assert = quizrank()
        .arg("analyze")
        .arg("--engine")
        .arg(&engine)
        .arg("--response")
        .arg(&response)
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["ending_results"][0]["ending_id"], "A");
    assert_eq!(value["ending_results"][0]["rank"], 1);
    assert!(out.exists());
}

#[test]
fn analyze_explain_shows_rules() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", ENGINE);
    let response = write(dir.path(), "r.json", r#"{"answers": {"Q1": 5}}"#);

    quizrank()
        .arg("analyze")
        .arg("--engine")
        .arg(&engine)
        .arg("--response")
        .arg(&response)
        .arg("--explain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Q1 [primary] answer 5 distance 3"));
}

#[test]
fn analyze_warns_on_out_of_domain_answer() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", ENGINE);
    let quiz = write(dir.path(), "quiz.toml", QUIZ);
    let response = write(dir.path(), "r.json", r#"{"answers": {"Q1": 12}}"#);

    quizrank()
        .arg("analyze")
        .arg("--engine")
        .arg(&engine)
        .arg("--response")
        .arg(&response)
        .arg("--quiz")
        .arg(&quiz)
        .assert()
        .success()
        .stderr(predicate::str::contains("outside 1..=10"));
}

#[test]
fn analyze_rejects_invalid_engine() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", BAD_ENGINE);
    let response = write(dir.path(), "r.json", r#"{"answers": {}}"#);

    quizrank()
        .arg("analyze")
        .arg("--engine")
        .arg(&engine)
        .arg("--response")
        .arg(&response)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.beta"))
        .stderr(predicate::str::contains("duplicate ending id: A"));
}

#[test]
fn validate_valid_engine() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", ENGINE);
    let quiz = write(dir.path(), "quiz.toml", QUIZ);

    quizrank()
        .arg("validate")
        .arg("--engine")
        .arg(&engine)
        .arg("--quiz")
        .arg(&quiz)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 endings, 2 rules"))
        .stdout(predicate::str::contains("Engine valid."));
}

#[test]
fn validate_reports_every_error() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", BAD_ENGINE);

    quizrank()
        .arg("validate")
        .arg("--engine")
        .arg(&engine)
        .assert()
        .failure()
        .stdout(predicate::str::contains("config.beta"))
        .stdout(predicate::str::contains("config.primary_distance_falloff"))
        .stdout(predicate::str::contains("no ideal answers"))
        .stdout(predicate::str::contains("duplicate ending id: A"))
        .stderr(predicate::str::contains("4 configuration error(s)"));
}

#[test]
fn validate_nonexistent_file() {
    quizrank()
        .arg("validate")
        .arg("--engine")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn batch_writes_report() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", ENGINE);
    let responses = write(
        dir.path(),
        "responses.json",
        r#"[{"id": "r1", "answers": {"Q1": 8}}, {"id": "r2", "answers": {"Q1": 1}}, {"id": "r3", "answers": {}}]"#,
    );
    let out = dir.path().join("results");

    quizrank()
        .current_dir(dir.path())
        .arg("batch")
        .arg("--engine")
        .arg(&engine)
        .arg("--responses")
        .arg(&responses)
        .arg("--parallelism")
        .arg("2")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Complete: 3/3 analyzed"))
        .stdout(predicate::str::contains("Top Count"));

    let reports: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
    assert_eq!(reports.len(), 1);
}

#[test]
fn batch_output_dir_error_names_path() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", ENGINE);
    let responses = write(dir.path(), "responses.json", r#"[{"answers": {"Q1": 8}}]"#);
    let blocker = write(dir.path(), "results", "not a directory");

    quizrank()
        .current_dir(dir.path())
        .arg("batch")
        .arg("--engine")
        .arg(&engine)
        .arg("--responses")
        .arg(&responses)
        .arg("--output")
        .arg(&blocker)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to create output directory"))
        .stderr(predicate::str::contains("results"));
}

#[test]
fn compare_detects_top_change() {
    let dir = TempDir::new().unwrap();
    let engine = write(dir.path(), "engine.toml", ENGINE);
    let first = write(dir.path(), "first.json", r#"{"answers": {"Q1": 8}}"#);
    let second = write(dir.path(), "second.json", r#"{"answers": {"Q1": 2}}"#);
    let baseline = dir.path().join("baseline.json");
    let current = dir.path().join("current.json");

    for (response, out) in [(&first, &baseline), (&second, &current)] {
        quizrank()
            .arg("analyze")
            .arg("--engine")
            .arg(&engine)
            .arg("--response")
            .arg(response)
            .arg("--output")
            .arg(out)
            .assert()
            .success();
    }

    quizrank()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .arg("--threshold")
        .arg("1.0")
        .arg("--fail-on-shift")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Top ending: A -> B (changed)"));

    quizrank()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&baseline)
        .arg("--threshold")
        .arg("1.0")
        .arg("--fail-on-shift")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 shifted, 2 unchanged"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizrank()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizrank.toml"))
        .stdout(predicate::str::contains("Created engines/example.toml"));

    assert!(dir.path().join("quizzes/example.toml").exists());
    assert!(dir.path().join("responses/example.json").exists());

    // Second run skips existing files
    quizrank()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn init_example_analyzes_cleanly() {
    let dir = TempDir::new().unwrap();

    quizrank().current_dir(dir.path()).arg("init").assert().success();

    quizrank()
        .current_dir(dir.path())
        .args(["validate", "--engine", "engines/example.toml", "--quiz", "quizzes/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Engine valid."));

    quizrank()
        .current_dir(dir.path())
        .args([
            "analyze",
            "--engine",
            "engines/example.toml",
            "--response",
            "responses/example.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Explorer"));
}
