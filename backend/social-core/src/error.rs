/// Error types for the social core
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Image ingestion failed: {0}")]
    Ingest(#[from] media_ingest::IngestError),

    /// The first of the two relationship writes succeeded but the mirror
    /// write did not; the relationship is left asymmetric until reconciled.
    #[error("relationship left asymmetric: {applied} side was written but the mirror write failed: {source}")]
    PartialFailure {
        applied: &'static str,
        #[source]
        source: Box<ServiceError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}

/// Result type alias for core operations
pub type ServiceResult<T> = Result<T, ServiceError>;
