/// Convenience result type used across vvstage.
pub type VvstageResult<T> = Result<T, VvstageError>;

/// Top-level error taxonomy used by the public APIs.
///
/// The timeline engine itself is total; these errors only surface at the edges
/// (frame-rate construction, stage configuration, document loading).
#[derive(thiserror::Error, Debug)]
pub enum VvstageError {
    /// Invalid user-provided project or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VvstageError {
    /// Build a [`VvstageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VvstageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
