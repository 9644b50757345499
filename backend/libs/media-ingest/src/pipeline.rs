//! Ingestion pipeline - validate, process, and persist one uploaded image
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use mime::Mime;
use tracing::info;
use uuid::Uuid;

use crate::error::{IngestError, Result};
use crate::processor::ImageProcessor;

/// Default upload limit: 1 MiB
pub const DEFAULT_MAX_BYTES: usize = 1024 * 1024;

/// Serving-path prefix for persisted images
const STATIC_PREFIX: &str = "/static";

/// Destination subdirectory for an ingested image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageCategory {
    /// Post images
    Uploads,
    /// User avatars
    Avatars,
}

impl ImageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageCategory::Uploads => "uploads",
            ImageCategory::Avatars => "avatars",
        }
    }
}

/// One upload to ingest
pub struct IngestRequest<'a> {
    /// Raw upload bytes
    pub bytes: Bytes,
    /// MIME type declared by the uploader; must be `image/*`
    pub declared_mime: &'a str,
    /// Owning user's name, used in the output file name
    pub owner_name: &'a str,
    pub category: ImageCategory,
    pub target_width: u32,
}

/// A persisted image and its final dimensions
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Relative serving path, e.g. `/static/uploads/alice-1712345678901-3f9ac2d4.jpg`
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Validates, resizes, and persists uploaded images under a static root
pub struct ImagePipeline {
    root: PathBuf,
    max_bytes: usize,
}

impl ImagePipeline {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    pub fn with_max_bytes(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Run one upload through the full pipeline.
    ///
    /// Rejections happen strictly before the decode, and the decode/resize
    /// strictly before the single file write; nothing lands on disk unless
    /// every stage succeeds.
    pub async fn ingest(&self, request: IngestRequest<'_>) -> Result<StoredImage> {
        let IngestRequest {
            bytes,
            declared_mime,
            owner_name,
            category,
            target_width,
        } = request;

        let mime: Mime = declared_mime
            .parse()
            .map_err(|_| IngestError::UnsupportedType(declared_mime.to_string()))?;
        if mime.type_() != mime::IMAGE {
            return Err(IngestError::UnsupportedType(declared_mime.to_string()));
        }

        if bytes.len() > self.max_bytes {
            return Err(IngestError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }

        let processor = Arc::new(ImageProcessor::new(target_width));
        let processed = processor.process_async(bytes).await?;

        // Millisecond timestamp plus a random suffix: two uploads by the same
        // user in the same millisecond still land on distinct paths.
        let file_name = format!(
            "{}-{}-{}.{}",
            sanitize_owner(owner_name),
            Utc::now().timestamp_millis(),
            disambiguator(),
            processed.extension,
        );

        let dir = self.root.join(category.as_str());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &processed.data).await?;

        let path = format!("{}/{}/{}", STATIC_PREFIX, category.as_str(), file_name);
        info!(
            %path,
            width = processed.width,
            height = processed.height,
            "image ingested"
        );

        Ok(StoredImage {
            path,
            width: processed.width,
            height: processed.height,
        })
    }
}

/// Keep the owner-derived part of the file name path-safe.
fn sanitize_owner(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "user".to_string()
    } else {
        cleaned
    }
}

fn disambiguator() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
