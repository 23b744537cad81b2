/// Error types for the plating core
use thiserror::Error;

/// Result type used throughout the core.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The flat vertex buffer does not hold whole triangles.
    #[error("invalid geometry: buffer of {len} scalars is not a multiple of 9")]
    InvalidGeometry { len: usize },

    /// A mesh was loaded without a single vertex.
    #[error("geometry contains no vertices")]
    EmptyGeometry,

    #[error("unknown mode '{0}', expected translate, rotate or scale")]
    UnknownMode(String),

    #[error("file too small to be a valid STL")]
    StlTooShort,

    #[error("STL truncated: header declares {expected} bytes, got {actual}")]
    StlTruncated { expected: usize, actual: usize },

    #[error("failed to parse ASCII STL: {0}")]
    StlSyntax(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
