use thiserror::Error;

/// Engine-level error type.
///
/// Only two failure kinds ever reach the caller: a validation rejection
/// (the record is missing required fields before synthesis) and an internal
/// fault. Extraction unavailability is recovered inside `parser` by falling
/// back to the heuristic path, and compilation failures degrade softly in
/// `pipeline`, so neither surfaces here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
