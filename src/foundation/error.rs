/// Convenience result type used across segcanvas.
pub type SegResult<T> = Result<T, SegError>;

/// Top-level error taxonomy used by the fallible (non-interactive) APIs.
///
/// Interactive canvas operations never surface these to their caller; they log and degrade.
#[derive(thiserror::Error, Debug)]
pub enum SegError {
    /// Invalid user-provided configuration or data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A vector partition is missing, undecodable or contains no usable shapes.
    #[error("partition error: {0}")]
    Partition(String),

    /// Asset metadata could not be read or written.
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SegError {
    /// Build a [`SegError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SegError::Partition`] value.
    pub fn partition(msg: impl Into<String>) -> Self {
        Self::Partition(msg.into())
    }

    /// Build a [`SegError::Metadata`] value.
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Build a [`SegError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for SegError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
