/// JPEG compression engine
///
/// Decodes any image the `image` crate understands, caps the longest edge,
/// and re-encodes as JPEG, stepping quality and size down until the output
/// fits the size budget or the attempt limit is reached.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, DynamicImage};
use tokio::task;
use tracing::debug;

use crate::error::CompressError;
use crate::state::data::{Bytes, CompressedImage};
use crate::state::settings::CompressionOptions;

/// Per-attempt shrink factor for quality and dimensions
const SHRINK_FACTOR: f32 = 0.95;

/// Compress an image.
///
/// With `use_parallel_execution` the CPU-heavy work runs on tokio's
/// blocking pool so the UI executor stays responsive.
pub async fn compress(
    source: Bytes,
    options: CompressionOptions,
) -> Result<CompressedImage, CompressError> {
    if options.use_parallel_execution {
        task::spawn_blocking(move || compress_blocking(&source, &options))
            .await
            .map_err(|e| CompressError::Worker(e.to_string()))?
    } else {
        compress_blocking(&source, &options)
    }
}

/// Blocking implementation of compression
///
/// The output is never larger than the source unless the source had to be
/// downscaled: if re-encoding cannot beat an image that already fits the
/// edge limit, the source bytes come back untouched.
pub fn compress_blocking(
    source: &[u8],
    options: &CompressionOptions,
) -> Result<CompressedImage, CompressError> {
    let img = image::load_from_memory(source).map_err(CompressError::decode)?;
    debug!("Decoded {}x{} source ({} bytes)", img.width(), img.height(), source.len());
    let (source_width, source_height) = (img.width(), img.height());

    let img = fit_within(img, options.max_width_or_height);
    let resized = (img.width(), img.height()) != (source_width, source_height);

    // JPEG has no alpha channel
    let img = DynamicImage::ImageRgb8(img.to_rgb8());

    let budget = options.max_size_bytes();
    let mut quality = options.quality.clamp(0.01, 1.0);
    let mut current = img;
    let mut bytes = encode_jpeg(&current, jpeg_quality(quality))?;
    let mut attempts = 1;

    loop {
        let over_budget = bytes.len() as u64 > budget;
        let over_source = bytes.len() > source.len();
        if !(over_budget || over_source) || attempts >= options.max_iterations.max(1) {
            break;
        }

        quality *= SHRINK_FACTOR;
        // Dimensions only give way to the size budget
        if over_budget {
            let width = ((current.width() as f32 * SHRINK_FACTOR) as u32).max(1);
            let height = ((current.height() as f32 * SHRINK_FACTOR) as u32).max(1);
            current = current.resize_exact(width, height, FilterType::Lanczos3);
        }
        bytes = encode_jpeg(&current, jpeg_quality(quality))?;
        attempts += 1;

        debug!(
            "   → attempt {}: {}x{} q{} = {} bytes",
            attempts,
            current.width(),
            current.height(),
            jpeg_quality(quality),
            bytes.len()
        );
    }

    if bytes.len() > source.len() && !resized {
        debug!(
            "Re-encode ({} bytes) larger than source ({} bytes), keeping source",
            bytes.len(),
            source.len()
        );
        return Ok(CompressedImage {
            bytes: source.to_vec(),
            width: source_width,
            height: source_height,
            jpeg_quality: None,
        });
    }

    if bytes.is_empty() {
        return Err(CompressError::EmptyOutput);
    }

    Ok(CompressedImage {
        bytes,
        width: current.width(),
        height: current.height(),
        jpeg_quality: Some(jpeg_quality(quality)),
    })
}

/// Downscale so the longest edge is at most `max_edge`, keeping aspect ratio
fn fit_within(img: DynamicImage, max_edge: u32) -> DynamicImage {
    if max_edge == 0 || img.width().max(img.height()) <= max_edge {
        return img;
    }
    debug!("Resizing {}x{} to fit {}px", img.width(), img.height(), max_edge);
    img.resize(max_edge, max_edge, FilterType::Lanczos3)
}

/// Map a 0.0-1.0 quality onto the encoder's 1-100 scale
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, CompressError> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    img.write_with_encoder(encoder).map_err(CompressError::encode)?;
    Ok(bytes)
}
