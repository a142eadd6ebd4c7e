//! Engine definition validation and quiz cross-checks.
//!
//! [`ValidatedEngine::new`] is the only way to obtain an engine that can
//! analyze responses. It rejects malformed definitions with every error found.
//! The quiz checks only produce warnings: a rule or answer that points at an
//! unknown question simply scores zero.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use crate::config::ScoringConfig;
use crate::error::{ConfigError, ValidationErrors};
use crate::model::{EngineDefinition, Quiz, QuizResponse};
use crate::ranker::normalize;
use crate::result::{AnalysisResult, EndingResult};
use crate::scorer::score;

/// An engine definition that passed validation.
///
/// Cheap to clone and safe to share between threads; the definition inside is
/// never mutated.
#[derive(Debug, Clone)]
pub struct ValidatedEngine {
    definition: Arc<EngineDefinition>,
}

impl ValidatedEngine {
    pub fn new(definition: EngineDefinition) -> Result<Self, ValidationErrors> {
        let errors = validate_engine(&definition);
        if !errors.is_empty() {
            return Err(ValidationErrors {
                engine_id: definition.id.clone(),
                errors,
            });
        }
        Ok(Self {
            definition: Arc::new(definition),
        })
    }

    pub fn definition(&self) -> &EngineDefinition {
        &self.definition
    }

    /// Score and rank a response.
    pub fn analyze(&self, response: &QuizResponse) -> AnalysisResult {
        let raw = score(&self.definition, response);
        let ranked = normalize(&raw, self.definition.config.beta);

        let ending_results: Vec<EndingResult> = ranked
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let display_name = self
                    .definition
                    .ending(&s.ending_id)
                    .map(|e| e.display_name.clone())
                    .unwrap_or_default();
                EndingResult {
                    ending_id: s.ending_id,
                    display_name,
                    points: s.points,
                    percentage: s.percentage,
                    rank: i + 1,
                }
            })
            .collect();

        if let Some(top) = ending_results.first() {
            tracing::debug!(
                engine = %self.definition.id,
                response = response.id.as_deref().unwrap_or("-"),
                answered = response.answers.len(),
                "top ending {} at {:.1}%",
                top.ending_id,
                top.percentage
            );
        }

        AnalysisResult::new(&self.definition, response, ending_results)
    }
}

impl Deref for ValidatedEngine {
    type Target = EngineDefinition;

    fn deref(&self) -> &Self::Target {
        &self.definition
    }
}

/// Check an engine definition, returning every problem found.
pub fn validate_engine(engine: &EngineDefinition) -> Vec<ConfigError> {
    let mut errors = validate_config(&engine.config);

    if engine.endings.is_empty() {
        errors.push(ConfigError::NoEndings);
    }

    let mut seen_endings = HashSet::new();
    for ending in &engine.endings {
        if !seen_endings.insert(&ending.id) {
            errors.push(ConfigError::DuplicateEnding(ending.id.clone()));
        }

        let mut seen_questions = HashSet::new();
        for rule in &ending.rules {
            if !seen_questions.insert(&rule.question_id) {
                errors.push(ConfigError::DuplicateRule {
                    ending: ending.id.clone(),
                    question: rule.question_id.clone(),
                });
            }
            if rule.ideal_answers.is_empty() {
                errors.push(ConfigError::EmptyIdealAnswers {
                    ending: ending.id.clone(),
                    question: rule.question_id.clone(),
                });
            }
            for &value in &rule.ideal_answers {
                if !value.is_finite() {
                    errors.push(ConfigError::NonFiniteIdealAnswer {
                        ending: ending.id.clone(),
                        question: rule.question_id.clone(),
                        value,
                    });
                }
            }
        }
    }

    errors
}

/// Check the numeric invariants of a scoring configuration.
pub fn validate_config(config: &ScoringConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for (field, value) in config.fields() {
        if !value.is_finite() {
            errors.push(ConfigError::NonFinite { field, value });
        }
    }

    for (field, value) in [
        ("primary_point_value", config.primary_point_value),
        ("secondary_point_value", config.secondary_point_value),
        ("primary_point_weight", config.primary_point_weight),
        ("secondary_point_weight", config.secondary_point_weight),
        ("score_multiplier", config.score_multiplier),
    ] {
        if value < 0.0 {
            errors.push(ConfigError::Negative { field, value });
        }
    }

    for (field, value) in [
        ("primary_distance_falloff", config.primary_distance_falloff),
        ("secondary_distance_falloff", config.secondary_distance_falloff),
    ] {
        if !(0.0..=1.0).contains(&value) && !value.is_nan() {
            errors.push(ConfigError::FalloffOutOfRange { field, value });
        }
    }

    // NaN is already reported as non-finite above.
    if config.beta <= 0.0 {
        errors.push(ConfigError::NonPositiveBeta(config.beta));
    }
    if config.distance_gamma <= 0.0 {
        errors.push(ConfigError::NonPositiveGamma(config.distance_gamma));
    }

    errors
}

/// A non-fatal finding from a quiz cross-check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// The ending the warning concerns, if any.
    pub ending_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a quiz for duplicate question ids and inverted answer domains.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for question in &quiz.questions {
        if !seen.insert(&question.id) {
            warnings.push(ValidationWarning {
                ending_id: None,
                message: format!("duplicate question id: {}", question.id),
            });
        }
        if question.domain.min > question.domain.max {
            warnings.push(ValidationWarning {
                ending_id: None,
                message: format!(
                    "question {}: answer domain {}..={} is empty",
                    question.id, question.domain.min, question.domain.max
                ),
            });
        }
    }

    warnings
}

/// Check that an engine's rules line up with the questions of a quiz.
pub fn check_engine_against_quiz(engine: &EngineDefinition, quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for ending in &engine.endings {
        if ending.rules.is_empty() {
            warnings.push(ValidationWarning {
                ending_id: Some(ending.id.to_string()),
                message: "ending has no rules and will always rank last".into(),
            });
        }

        for rule in &ending.rules {
            let Some(question) = quiz.question(&rule.question_id) else {
                warnings.push(ValidationWarning {
                    ending_id: Some(ending.id.to_string()),
                    message: format!(
                        "rule references question {} which is not in quiz {}",
                        rule.question_id, quiz.id
                    ),
                });
                continue;
            };

            for &ideal in &rule.ideal_answers {
                if !question.domain.contains(ideal) {
                    warnings.push(ValidationWarning {
                        ending_id: Some(ending.id.to_string()),
                        message: format!(
                            "ideal answer {ideal} for question {} is outside {}..={}",
                            rule.question_id, question.domain.min, question.domain.max
                        ),
                    });
                }
            }
        }
    }

    warnings
}

/// Check a response against a quiz. Unknown questions and out-of-domain
/// answers are reported but still scored as given.
pub fn check_response_against_quiz(response: &QuizResponse, quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (question_id, &answer) in &response.answers {
        match quiz.question(question_id) {
            None => warnings.push(ValidationWarning {
                ending_id: None,
                message: format!("answer to unknown question {question_id}"),
            }),
            Some(q) if !q.domain.contains(answer) => warnings.push(ValidationWarning {
                ending_id: None,
                message: format!(
                    "answer {answer} to question {question_id} is outside {}..={}",
                    q.domain.min, q.domain.max
                ),
            }),
            Some(_) => {}
        }
    }

    warnings
}
