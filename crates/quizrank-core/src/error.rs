//! Engine configuration error types.
//!
//! These errors are raised when an engine definition is validated, before any
//! response is scored. Each variant names the ending, rule, or config field
//! that is at fault so an operator can find it in the definition file.

use std::fmt;

use thiserror::Error;

use crate::model::{EndingId, QuestionId};

/// A single problem found in an engine definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The engine defines no endings at all.
    #[error("engine defines no endings")]
    NoEndings,

    /// Two endings share the same identifier.
    #[error("duplicate ending id: {0}")]
    DuplicateEnding(EndingId),

    /// An ending has more than one rule for the same question.
    #[error("ending {ending}: duplicate rule for question {question}")]
    DuplicateRule {
        ending: EndingId,
        question: QuestionId,
    },

    /// A rule has no ideal answers.
    #[error("ending {ending}: rule for question {question} has no ideal answers")]
    EmptyIdealAnswers {
        ending: EndingId,
        question: QuestionId,
    },

    /// A rule lists an ideal answer that is NaN or infinite.
    #[error("ending {ending}: rule for question {question} has non-finite ideal answer {value}")]
    NonFiniteIdealAnswer {
        ending: EndingId,
        question: QuestionId,
        value: f64,
    },

    /// A config field is NaN or infinite.
    #[error("config.{field}: must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// The separation exponent is zero or negative.
    #[error("config.beta: must be greater than 0, got {0}")]
    NonPositiveBeta(f64),

    /// The distance exponent is zero or negative.
    #[error("config.distance_gamma: must be greater than 0, got {0}")]
    NonPositiveGamma(f64),

    /// A falloff fraction lies outside [0, 1].
    #[error("config.{field}: must be within [0, 1], got {value}")]
    FalloffOutOfRange { field: &'static str, value: f64 },

    /// A point value, weight, or multiplier is negative.
    #[error("config.{field}: must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Every problem found while validating an engine definition.
///
/// Validation never stops at the first error, so a definition with several
/// mistakes reports all of them at once.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationErrors {
    /// Engine the errors belong to.
    pub engine_id: String,
    /// The individual errors, in the order they were found.
    pub errors: Vec<ConfigError>,
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "engine '{}' has {} configuration error(s)",
            self.engine_id,
            self.errors.len()
        )?;
        for e in &self.errors {
            write!(f, "\n  - {e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_error() {
        let errs = ValidationErrors {
            engine_id: "personality".into(),
            errors: vec![
                ConfigError::NonPositiveBeta(0.0),
                ConfigError::DuplicateEnding(EndingId::from("hero")),
            ],
        };
        let text = errs.to_string();
        assert!(text.contains("2 configuration error(s)"));
        assert!(text.contains("config.beta"));
        assert!(text.contains("duplicate ending id: hero"));
    }

    #[test]
    fn rule_errors_name_ending_and_question() {
        let e = ConfigError::EmptyIdealAnswers {
            ending: EndingId::from("sage"),
            question: QuestionId::from("q3"),
        };
        assert_eq!(
            e.to_string(),
            "ending sage: rule for question q3 has no ideal answers"
        );
    }
}
