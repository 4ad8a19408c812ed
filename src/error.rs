use thiserror::Error;

/// Errors surfaced to callers of the engine.
///
/// Upstream AI failures never appear here: both the question generator and
/// the answer judge are wrapped in deterministic fallbacks, so the only
/// errors a caller can see are structural (bad input, unknown session) or
/// the terminal "nothing to ask" condition.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Session is already complete")]
    SessionAlreadyComplete,
    #[error("No questions available for the requested filters")]
    NoQuestionsAvailable,
}

pub type Result<T> = std::result::Result<T, EngineError>;
