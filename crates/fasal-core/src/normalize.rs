//! Upload normalization: decode, bound the dimensions, re-encode as JPEG.
//!
//! Every upload leaves this stage as a JPEG no larger than
//! `image.max_dimension` on either edge, regardless of the format it arrived in.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::config::ImageConfig;
use crate::error::{DiagnosisError, DiagnosisResult};
use crate::llm::ImageInput;

/// Decodes, downsamples and re-encodes uploaded images.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    config: ImageConfig,
}

/// An upload that passed validation and was re-encoded to the transport format.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG-encoded bytes
    pub bytes: Vec<u8>,
    /// Width after normalization
    pub width: u32,
    /// Height after normalization
    pub height: u32,
    /// Width of the upload as decoded
    pub original_width: u32,
    /// Height of the upload as decoded
    pub original_height: u32,
    /// Detected format of the upload ("jpeg", "png", ...)
    pub source_format: String,
}

impl NormalizedImage {
    /// Whether the image was downsampled.
    pub fn was_resized(&self) -> bool {
        self.width != self.original_width || self.height != self.original_height
    }

    /// Base64 transport encoding for provider requests.
    pub fn to_image_input(&self) -> ImageInput {
        ImageInput::jpeg(&self.bytes)
    }
}

impl ImageNormalizer {
    /// Create a normalizer with the given image settings.
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    /// Normalize an upload on the blocking pool.
    ///
    /// Decoding is not time-bounded; only undecodable input fails, as `InvalidImage`.
    pub async fn normalize(&self, bytes: Vec<u8>) -> DiagnosisResult<NormalizedImage> {
        let max_dimension = self.config.max_dimension;
        let quality = self.config.jpeg_quality;

        tokio::task::spawn_blocking(move || Self::normalize_sync(&bytes, max_dimension, quality))
            .await
            .map_err(|e| DiagnosisError::Internal(format!("Image task join error: {e}")))?
    }

    /// Synchronous normalization (runs in spawn_blocking).
    pub fn normalize_sync(
        bytes: &[u8],
        max_dimension: u32,
        quality: u8,
    ) -> DiagnosisResult<NormalizedImage> {
        if bytes.is_empty() {
            return Err(DiagnosisError::InvalidImage("empty upload".to_string()));
        }

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| {
                DiagnosisError::InvalidImage(format!("cannot detect image format: {e}"))
            })?;
        let format = reader.format().ok_or_else(|| {
            DiagnosisError::InvalidImage("cannot identify image file".to_string())
        })?;
        let decoded = reader
            .decode()
            .map_err(|e| DiagnosisError::InvalidImage(e.to_string()))?;

        let (original_width, original_height) = decoded.dimensions();
        let bounded = if original_width > max_dimension || original_height > max_dimension {
            // Aspect-preserving: the longer edge lands on max_dimension
            decoded.thumbnail(max_dimension, max_dimension)
        } else {
            decoded
        };
        let (width, height) = bounded.dimensions();

        tracing::trace!(
            "Normalized {} {}x{} -> {}x{}",
            format_to_string(format),
            original_width,
            original_height,
            width,
            height
        );

        Ok(NormalizedImage {
            bytes: encode_jpeg(&bounded, quality)?,
            width,
            height,
            original_width,
            original_height,
            source_format: format_to_string(format),
        })
    }
}

/// Encode as baseline JPEG. Alpha and high bit depths are dropped.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> DiagnosisResult<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(&rgb)
        .map_err(|e| DiagnosisError::Internal(format!("JPEG encode failed: {e}")))?;
    Ok(buffer)
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        encoded(DynamicImage::new_rgb8(width, height), ImageFormat::Png)
    }

    #[test]
    fn test_small_image_keeps_dimensions() {
        let result = ImageNormalizer::normalize_sync(&png(640, 480), 2048, 75).unwrap();
        assert_eq!((result.width, result.height), (640, 480));
        assert!(!result.was_resized());
        assert_eq!(result.source_format, "png");
        // Re-encoded as JPEG
        assert_eq!(&result.bytes[0..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_exact_limit_is_not_resized() {
        let result = ImageNormalizer::normalize_sync(&png(2048, 100), 2048, 75).unwrap();
        assert_eq!((result.width, result.height), (2048, 100));
        assert!(!result.was_resized());
    }

    #[test]
    fn test_large_landscape_downsampled_with_aspect_ratio() {
        let jpeg = encoded(DynamicImage::new_rgb8(4000, 3000), ImageFormat::Jpeg);
        let result = ImageNormalizer::normalize_sync(&jpeg, 2048, 75).unwrap();
        assert_eq!((result.width, result.height), (2048, 1536));
        assert_eq!((result.original_width, result.original_height), (4000, 3000));
        assert!(result.was_resized());
        assert_eq!(result.source_format, "jpeg");
    }

    #[test]
    fn test_large_portrait_downsampled_within_bounds() {
        let result = ImageNormalizer::normalize_sync(&png(1000, 4500), 2048, 75).unwrap();
        assert_eq!(result.height, 2048);
        assert!(result.width <= 2048);

        let original_ratio = 1000.0 / 4500.0;
        let ratio = result.width as f64 / result.height as f64;
        assert!((ratio - original_ratio).abs() < 0.01);
    }

    #[test]
    fn test_output_decodes_to_reported_dimensions() {
        let result = ImageNormalizer::normalize_sync(&png(3000, 3000), 2048, 75).unwrap();
        let reloaded = image::load_from_memory(&result.bytes).unwrap();
        assert_eq!(reloaded.dimensions(), (result.width, result.height));
    }

    #[test]
    fn test_rgba_input_is_flattened() {
        let rgba = encoded(DynamicImage::new_rgba8(32, 32), ImageFormat::Png);
        let result = ImageNormalizer::normalize_sync(&rgba, 2048, 75).unwrap();
        assert_eq!((result.width, result.height), (32, 32));
    }

    #[test]
    fn test_non_image_bytes_rejected() {
        let err = ImageNormalizer::normalize_sync(b"definitely not an image", 2048, 75)
            .unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidImage(_)));
    }

    #[test]
    fn test_truncated_image_rejected() {
        let mut bytes = png(64, 64);
        bytes.truncate(20);
        let err = ImageNormalizer::normalize_sync(&bytes, 2048, 75).unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidImage(_)));
    }

    #[test]
    fn test_empty_upload_rejected() {
        let err = ImageNormalizer::normalize_sync(&[], 2048, 75).unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidImage(_)));
    }

    #[test]
    fn test_image_input_is_jpeg_base64() {
        let result = ImageNormalizer::normalize_sync(&png(8, 8), 2048, 75).unwrap();
        let input = result.to_image_input();
        assert_eq!(input.media_type, "image/jpeg");
        // base64 of FF D8 FF
        assert!(input.data.starts_with("/9j/"));
    }

    #[tokio::test]
    async fn test_async_normalize() {
        let normalizer = ImageNormalizer::new(ImageConfig::default());
        let result = normalizer.normalize(png(100, 50)).await.unwrap();
        assert_eq!((result.width, result.height), (100, 50));

        let err = normalizer.normalize(vec![1, 2, 3, 4]).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_async_normalize_large_jpeg_succeeds() {
        let jpeg = encoded(DynamicImage::new_rgb8(4000, 3000), ImageFormat::Jpeg);
        let normalizer = ImageNormalizer::new(ImageConfig::default());

        // Slow decodes (unoptimized builds) must still succeed, never time out
        let result = normalizer.normalize(jpeg).await.unwrap();
        assert_eq!((result.width, result.height), (2048, 1536));
    }
}
