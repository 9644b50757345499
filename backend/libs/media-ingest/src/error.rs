/// Error types for image ingestion
use thiserror::Error;

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Declared MIME type is not an image type
    #[error("unsupported upload type: {0}")]
    UnsupportedType(String),

    /// Upload exceeds the configured byte limit
    #[error("upload of {size} bytes exceeds the {limit}-byte limit")]
    TooLarge { size: usize, limit: usize },

    /// Accepted bytes did not decode as an image
    #[error("could not decode image data")]
    DecodeFailed(#[source] image::ImageError),

    /// Resized image could not be re-encoded
    #[error("could not encode resized image")]
    EncodeFailed(#[source] image::ImageError),

    /// Writing the output file failed
    #[error("failed to persist image file")]
    Persist(#[from] std::io::Error),

    /// The blocking image task panicked or was cancelled
    #[error("image processing task failed: {0}")]
    Task(String),
}
