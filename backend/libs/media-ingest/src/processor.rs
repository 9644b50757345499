//! Image processor - decodes, resizes, and re-encodes uploaded images
//!
//! Pins the output width to the requested target and scales the height to
//! preserve the aspect ratio. Sources narrower than the target are scaled up
//! so the output width always lands on the target ("auto height" semantics).
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the
//! async runtime.

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat, ImageOutputFormat};
use tracing::debug;

use crate::error::{IngestError, Result};

const JPEG_QUALITY: u8 = 85;

/// Result of processing one upload
#[derive(Debug)]
pub struct ProcessedImage {
    /// Re-encoded image data, ready to be written out
    pub data: Bytes,
    /// Output width in pixels (always the target width)
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// File extension matching the encoded container
    pub extension: &'static str,
}

/// Decode / resize / encode worker for a fixed target width
pub struct ImageProcessor {
    target_width: u32,
}

impl ImageProcessor {
    pub fn new(target_width: u32) -> Self {
        Self { target_width }
    }

    /// Process one upload (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not
    /// be called directly from async code. Use `process_async` instead.
    pub fn process(&self, data: &[u8]) -> Result<ProcessedImage> {
        // The container format is sniffed from the bytes, never trusted from
        // the declared MIME type.
        let format = image::guess_format(data).map_err(IngestError::DecodeFailed)?;
        let img = image::load_from_memory(data).map_err(IngestError::DecodeFailed)?;

        let (orig_w, orig_h) = img.dimensions();
        let (new_w, new_h) = self.scaled_dimensions(orig_w, orig_h);

        let resized = if (new_w, new_h) == (orig_w, orig_h) {
            img
        } else {
            img.resize_exact(new_w, new_h, FilterType::Triangle)
        };

        let (output, extension) = output_format(format);
        let mut buf = Vec::new();
        resized
            .write_to(&mut Cursor::new(&mut buf), output)
            .map_err(IngestError::EncodeFailed)?;

        debug!(
            original_width = orig_w,
            original_height = orig_h,
            width = new_w,
            height = new_h,
            size = buf.len(),
            "image processed"
        );

        Ok(ProcessedImage {
            data: Bytes::from(buf),
            width: new_w,
            height: new_h,
            extension,
        })
    }

    /// Process one upload asynchronously using a blocking thread pool
    pub async fn process_async(self: Arc<Self>, data: Bytes) -> Result<ProcessedImage> {
        let processor = self.clone();

        tokio::task::spawn_blocking(move || processor.process(&data))
            .await
            .map_err(|e| IngestError::Task(format!("image task panicked: {e}")))?
    }

    /// Output width is pinned to the target; height follows the aspect ratio.
    fn scaled_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width == self.target_width {
            return (width, height);
        }
        let ratio = self.target_width as f32 / width as f32;
        let scaled = ((height as f32) * ratio).round().max(1.0) as u32;
        (self.target_width, scaled)
    }
}

/// Pick the output container for a sniffed input format.
///
/// Formats the `image` crate can decode but not encode (webp among them) are
/// normalized to PNG.
fn output_format(format: ImageFormat) -> (ImageOutputFormat, &'static str) {
    match format {
        ImageFormat::Jpeg => (ImageOutputFormat::Jpeg(JPEG_QUALITY), "jpg"),
        ImageFormat::Gif => (ImageOutputFormat::Gif, "gif"),
        ImageFormat::Bmp => (ImageOutputFormat::Bmp, "bmp"),
        ImageFormat::Tiff => (ImageOutputFormat::Tiff, "tiff"),
        _ => (ImageOutputFormat::Png, "png"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn scaled_dimensions_landscape() {
        let processor = ImageProcessor::new(750);
        let (w, h) = processor.scaled_dimensions(1500, 1000);
        assert_eq!(w, 750);
        assert_eq!(h, 500);
    }

    #[test]
    fn scaled_dimensions_portrait() {
        let processor = ImageProcessor::new(250);
        let (w, h) = processor.scaled_dimensions(500, 800);
        assert_eq!(w, 250);
        assert_eq!(h, 400);
    }

    #[test]
    fn scaled_dimensions_upscales_narrow_source() {
        let processor = ImageProcessor::new(750);
        let (w, h) = processor.scaled_dimensions(300, 150);
        assert_eq!(w, 750);
        assert_eq!(h, 375);
    }

    #[test]
    fn scaled_dimensions_height_never_hits_zero() {
        let processor = ImageProcessor::new(750);
        let (_, h) = processor.scaled_dimensions(4000, 1);
        assert_eq!(h, 1);
    }

    #[test]
    fn process_resizes_to_target_width() {
        let processor = ImageProcessor::new(100);
        let result = processor.process(&png_bytes(400, 200)).unwrap();
        assert_eq!(result.width, 100);
        assert_eq!(result.height, 50);
        assert_eq!(result.extension, "png");
        assert!(!result.data.is_empty());
    }

    #[test]
    fn process_rejects_garbage_bytes() {
        let processor = ImageProcessor::new(100);
        let err = processor.process(b"definitely not an image").unwrap_err();
        assert!(matches!(err, IngestError::DecodeFailed(_)));
    }
}
