/// Convenience result type used across the crate.
pub type SpriterResult<T> = Result<T, SpriterError>;

/// Top-level error taxonomy used by rig loading and player APIs.
#[derive(thiserror::Error, Debug)]
pub enum SpriterError {
    /// Malformed rig data rejected at load time.
    #[error("validation error: {0}")]
    Validation(String),

    /// A caller passed an argument the player cannot act on; prior state is left intact.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Errors when serializing or deserializing rig documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpriterError {
    /// Build a [`SpriterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SpriterError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`SpriterError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
