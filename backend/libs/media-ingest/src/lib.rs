//! Validated image ingestion: upload bytes in, one resized file on disk out.
//!
//! The pipeline rejects non-image and oversized uploads before touching the
//! bytes, decodes and resizes on a blocking thread, and only then writes a
//! single file under the configured static root. Post images and avatars run
//! through the same pipeline, parameterized by target width and category.

pub mod error;
pub mod pipeline;
pub mod processor;

pub use error::{IngestError, Result};
pub use pipeline::{ImageCategory, ImagePipeline, IngestRequest, StoredImage, DEFAULT_MAX_BYTES};
pub use processor::{ImageProcessor, ProcessedImage};
