use thiserror::Error;

/// Fatal engine errors. Everything recoverable is a
/// [`SelectionWarning`](crate::types::SelectionWarning) on the outcome
/// instead; the engine prefers partial, annotated results over failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Structurally invalid requirements, e.g. an unknown tier name in an
    /// explicit breakdown.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("budget must be non-negative, got {0}")]
    InvalidBudget(f64),

    #[error("candidate pool is empty")]
    EmptyPool,
}
