/// Convenience result type used across brushplan.
pub type BrushResult<T> = Result<T, BrushError>;

/// Top-level error taxonomy used by the crate's fallible APIs.
///
/// Compilation itself never fails: malformed strokes degrade into warning
/// annotation patches (see [`crate::compile_batch`]). Errors surface only at
/// the wire boundary and when constructing providers.
#[derive(thiserror::Error, Debug)]
pub enum BrushError {
    /// Invalid user-provided batch or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing wire payloads.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BrushError {
    /// Build a [`BrushError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BrushError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
