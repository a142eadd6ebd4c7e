//! The `quizrank init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizrank.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("engines/example.toml"), EXAMPLE_ENGINE)?;
    write_if_missing(Path::new("quizzes/example.toml"), EXAMPLE_QUIZ)?;
    write_if_missing(Path::new("responses/example.json"), EXAMPLE_RESPONSE)?;

    println!("\nNext steps:");
    println!("  1. Run: quizrank validate --engine engines/example.toml --quiz quizzes/example.toml");
    println!("  2. Run: quizrank analyze --engine engines/example.toml --response responses/example.json --explain");
    println!("  3. Run: quizrank batch --engine engines/example.toml --responses responses");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    println!("Created {}", path.display());
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrank configuration

parallelism = 4
output_dir = "./quizrank-results"
shift_threshold = 1.0
"#;

const EXAMPLE_ENGINE: &str = r#"[engine]
id = "example"
name = "Example Archetypes"
version = 1

[config]
primary_point_value = 10
secondary_point_value = 5
primary_point_weight = 1.0
secondary_point_weight = 1.0
primary_distance_falloff = 0.1
secondary_distance_falloff = 0.2
primary_min_points = 0
secondary_min_points = 0
beta = 1.5
distance_gamma = 1.0
score_multiplier = 1.0

[[endings]]
id = "explorer"
name = "The Explorer"

[[endings.rules]]
question = "novelty"
ideal = [9, 10]
primary = true

[[endings.rules]]
question = "routine"
ideal = [1, 2]

[[endings]]
id = "guardian"
name = "The Guardian"

[[endings.rules]]
question = "routine"
ideal = [9, 10]
primary = true

[[endings.rules]]
question = "novelty"
ideal = [2, 3]

[[endings]]
id = "diplomat"
name = "The Diplomat"

[[endings.rules]]
question = "people"
ideal = [8, 9, 10]
primary = true

[[endings.rules]]
question = "novelty"
ideal = [5, 6]
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
id = "example"
title = "Which archetype are you?"

[[questions]]
id = "novelty"
text = "I go out of my way to try things I have never done."
min = 1
max = 10

[[questions]]
id = "routine"
text = "I feel best when my days follow a routine."
min = 1
max = 10

[[questions]]
id = "people"
text = "I enjoy helping others settle disagreements."
min = 1
max = 10
"#;

const EXAMPLE_RESPONSE: &str = r#"{
  "id": "example-response",
  "answers": {
    "novelty": 8,
    "routine": 3,
    "people": 6
  }
}
"#;
