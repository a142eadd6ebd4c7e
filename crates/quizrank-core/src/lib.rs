//! quizrank-core: ending scorer, ranker, and analysis data model.
//!
//! This crate maps a quiz response onto a ranked percentage distribution over
//! the endings of an analysis engine. Scoring and normalization are pure
//! functions; everything else (file loading, batch runs, comparison) is built
//! on top of them.

pub mod batch;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod ranker;
pub mod result;
pub mod scorer;
pub mod statistics;
pub mod validation;

pub use config::ScoringConfig;
pub use error::{ConfigError, ValidationErrors};
pub use model::{
    AnswerDomain, EndingDefinition, EndingId, EngineDefinition, Question, QuestionId,
    QuestionRule, Quiz, QuizResponse,
};
pub use ranker::{normalize, EndingScore};
pub use result::{AnalysisResult, EndingResult};
pub use scorer::{explain, score};
pub use validation::ValidatedEngine;
