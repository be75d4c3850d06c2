//! Size-bounded image compression
//!
//! Oversized uploads are decoded once and re-encoded in their own format along a
//! descending quality (JPEG, WebP) or compression-level (PNG) schedule until the
//! output fits the configured limit or the schedule runs out.

#[cfg(feature = "image")]
use image::{DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;

const LOSSY_QUALITY_START: u8 = 90;
const LOSSY_QUALITY_FLOOR: u8 = 70;
const LOSSY_QUALITY_STEP: usize = 10;
const PNG_LEVEL_START: u8 = 9;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Image formats the compressor accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
}

impl ImageKind {
    /// Resolve a declared MIME type. Parameters are ignored and matching is case-insensitive.
    pub fn from_mime(mime_type: &str) -> Result<Self, CompressionError> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Ok(ImageKind::Jpeg),
            "image/png" => Ok(ImageKind::Png),
            "image/webp" => Ok(ImageKind::WebP),
            _ => Err(CompressionError::UnsupportedFormat(mime_type.to_string())),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::WebP => "image/webp",
        }
    }

    /// Encoder settings to try, most faithful first.
    ///
    /// JPEG and WebP step quality down from 90 to 70; PNG steps its compression level
    /// from 9 to 0.
    pub fn schedule(self) -> Vec<u8> {
        match self {
            ImageKind::Jpeg | ImageKind::WebP => (LOSSY_QUALITY_FLOOR..=LOSSY_QUALITY_START)
                .rev()
                .step_by(LOSSY_QUALITY_STEP)
                .collect(),
            ImageKind::Png => (0..=PNG_LEVEL_START).rev().collect(),
        }
    }

    #[cfg(feature = "image")]
    fn image_format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::WebP => ImageFormat::WebP,
        }
    }
}

/// Result of the shrink loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkOutcome {
    /// Smallest bytes seen, the original included
    pub data: Vec<u8>,
    /// Number of encoder invocations
    pub iterations: u32,
    pub within_limit: bool,
    /// Size of `data` after each iteration
    pub size_history: Vec<usize>,
}

/// Re-encode until the output fits `max_size` or `schedule` is exhausted.
///
/// `encode` is called with each schedule step in order. Input already within the limit
/// is returned untouched without calling `encode`. The kept bytes only ever shrink, so
/// `size_history` is non-increasing.
pub fn shrink_until<F>(
    original: Vec<u8>,
    max_size: usize,
    schedule: &[u8],
    mut encode: F,
) -> Result<ShrinkOutcome, CompressionError>
where
    F: FnMut(u8) -> Result<Vec<u8>, CompressionError>,
{
    if original.len() <= max_size {
        return Ok(ShrinkOutcome {
            data: original,
            iterations: 0,
            within_limit: true,
            size_history: Vec::new(),
        });
    }

    let mut best = original;
    let mut iterations = 0;
    let mut size_history = Vec::with_capacity(schedule.len());

    for &setting in schedule {
        let candidate = encode(setting)?;
        iterations += 1;

        tracing::debug!(
            setting = setting,
            candidate_bytes = candidate.len(),
            best_bytes = best.len(),
            max_size = max_size,
            "Compression iteration"
        );

        if candidate.len() < best.len() {
            best = candidate;
        }
        size_history.push(best.len());

        if best.len() <= max_size {
            break;
        }
    }

    Ok(ShrinkOutcome {
        within_limit: best.len() <= max_size,
        data: best,
        iterations,
        size_history,
    })
}

/// A compressed upload ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub data: Vec<u8>,
    pub kind: ImageKind,
    pub original_size: usize,
    pub iterations: u32,
    /// False when even the last schedule step stayed above the limit
    pub within_limit: bool,
}

impl CompressedImage {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Size-bounded compressor
#[cfg(feature = "image")]
#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    max_size: usize,
}

#[cfg(feature = "image")]
impl Compressor {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Bring `data` under the size limit, keeping its format.
    ///
    /// CPU-bound; run it off the async executor.
    pub fn compress(
        &self,
        data: Vec<u8>,
        mime_type: &str,
    ) -> Result<CompressedImage, CompressionError> {
        let kind = ImageKind::from_mime(mime_type)?;
        let original_size = data.len();

        match image::guess_format(&data) {
            Ok(format) if format == kind.image_format() => {}
            _ => {
                return Err(CompressionError::Decode(format!(
                    "content does not match {}",
                    kind.mime_type()
                )))
            }
        }

        if original_size <= self.max_size {
            return Ok(CompressedImage {
                data,
                kind,
                original_size,
                iterations: 0,
                within_limit: true,
            });
        }

        let start = std::time::Instant::now();
        let img = image::load_from_memory_with_format(&data, kind.image_format())
            .map_err(|e| CompressionError::Decode(e.to_string()))?;

        let outcome = shrink_until(data, self.max_size, &kind.schedule(), |setting| {
            encode(&img, kind, setting)
        })?;

        tracing::info!(
            mime_type = kind.mime_type(),
            original_bytes = original_size,
            compressed_bytes = outcome.data.len(),
            max_bytes = self.max_size,
            iterations = outcome.iterations,
            within_limit = outcome.within_limit,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image compression finished"
        );

        Ok(CompressedImage {
            data: outcome.data,
            kind,
            original_size,
            iterations: outcome.iterations,
            within_limit: outcome.within_limit,
        })
    }
}

#[cfg(feature = "image")]
fn encode(img: &DynamicImage, kind: ImageKind, setting: u8) -> Result<Vec<u8>, CompressionError> {
    match kind {
        ImageKind::Jpeg => encode_jpeg(img, setting),
        ImageKind::Png => encode_png(img, setting),
        ImageKind::WebP => encode_webp(img, setting),
    }
}

/// Encode to JPEG using mozjpeg
#[cfg(feature = "image")]
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, CompressionError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| CompressionError::Encode(e.to_string()))?;
    comp.write_scanlines(&rgb_img)
        .map_err(|e| CompressionError::Encode(e.to_string()))?;
    comp.finish()
        .map_err(|e| CompressionError::Encode(e.to_string()))
}

/// Encode to PNG; levels 0-9 map onto the encoder's fast, default and best presets
#[cfg(feature = "image")]
fn encode_png(img: &DynamicImage, level: u8) -> Result<Vec<u8>, CompressionError> {
    use image::codecs::png::{CompressionType, FilterType, PngEncoder};

    let (compression, filter) = match level {
        7..=9 => (CompressionType::Best, FilterType::Adaptive),
        3..=6 => (CompressionType::Default, FilterType::Adaptive),
        _ => (CompressionType::Fast, FilterType::Sub),
    };

    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buffer, compression, filter);
    img.write_with_encoder(encoder)
        .map_err(|e| CompressionError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Encode to lossy WebP
#[cfg(feature = "image")]
fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, CompressionError> {
    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(quality as f32);

    Ok(webp_data.to_vec())
}
