pub mod analyze;
pub mod batch;
pub mod compare;
pub mod init;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use quizrank_core::parser;
use quizrank_core::ValidatedEngine;

/// Parse and validate an engine definition file.
pub(crate) fn load_engine(path: &Path) -> Result<ValidatedEngine> {
    let definition = parser::parse_engine(path)?;
    let engine = ValidatedEngine::new(definition)?;
    tracing::debug!(
        "loaded engine {} v{} ({} endings)",
        engine.id,
        engine.version,
        engine.endings.len()
    );
    Ok(engine)
}
