use pasc_bits::BitError;
use thiserror::Error;

/// Errors surfaced by every pipeline stage.
///
/// All of them are synchronous input or programmer errors; none is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PascError {
    #[error("{stage}: expected {expected}, got {found}")]
    TypeMismatch {
        stage: String,
        expected: String,
        found: String,
    },
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Unsupported bit width: {0} (expected 32 or 64)")]
    UnsupportedBitWidth(u32),
    #[error("Malformed stream: {0}")]
    MalformedStream(String),
    #[error("Non-canonical value {bits:#x} at index {index}")]
    NonCanonicalValue { index: usize, bits: u64 },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Bit stream error: {0}")]
    Bits(#[from] BitError),
}

impl PascError {
    pub fn type_mismatch(
        stage: impl Into<String>,
        expected: impl Into<String>,
        found: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            stage: stage.into(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}
