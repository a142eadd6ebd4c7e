//! Core data model types for quizrank.
//!
//! These are the types the scorer reads: quizzes and their answer domains,
//! engine definitions with their endings and rules, and quiz responses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable identifier of a quiz question.
    QuestionId
);

string_id!(
    /// Identifier of an ending, unique within one engine.
    EndingId
);

/// Inclusive range of legal rating answers for a question (e.g. 1-10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDomain {
    pub min: i64,
    pub max: i64,
}

impl AnswerDomain {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Whether `value` is a legal answer in this domain.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min as f64 && value <= self.max as f64
    }

    /// Largest possible distance between two answers in this domain.
    pub fn span(&self) -> f64 {
        (self.max - self.min).max(0) as f64
    }
}

impl Default for AnswerDomain {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

/// A single quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub domain: AnswerDomain,
}

/// An ordered list of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }
}

/// Binds one ending to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRule {
    pub question_id: QuestionId,
    /// Answers that score full points for this rule.
    pub ideal_answers: Vec<f64>,
    #[serde(default)]
    pub is_primary: bool,
}

impl QuestionRule {
    pub fn new(question_id: impl Into<QuestionId>, ideal_answers: Vec<f64>, is_primary: bool) -> Self {
        Self {
            question_id: question_id.into(),
            ideal_answers,
            is_primary,
        }
    }

    /// Distance from `answer` to the nearest ideal answer.
    ///
    /// Returns `None` when the rule has no ideal answers; validated engines
    /// never contain such rules.
    pub fn distance(&self, answer: f64) -> Option<f64> {
        self.ideal_answers
            .iter()
            .map(|ideal| (answer - ideal).abs())
            .reduce(f64::min)
    }
}

/// A named outcome category and the rules that score it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingDefinition {
    pub id: EndingId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub rules: Vec<QuestionRule>,
}

/// The complete scoring program: endings plus their scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub endings: Vec<EndingDefinition>,
    #[serde(default)]
    pub config: ScoringConfig,
}

fn default_version() -> u32 {
    1
}

impl EngineDefinition {
    pub fn ending(&self, id: &EndingId) -> Option<&EndingDefinition> {
        self.endings.iter().find(|e| &e.id == id)
    }
}

/// A set of answers to a quiz. Questions without an entry are unanswered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<QuestionId, f64>,
}

impl QuizResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn answer(mut self, question: impl Into<QuestionId>, value: f64) -> Self {
        self.answers.insert(question.into(), value);
        self
    }

    pub fn get(&self, question: &QuestionId) -> Option<f64> {
        self.answers.get(question).copied()
    }
}
