/// Shared data structures for the compression workflow
///
/// These structs represent the data model that flows between
/// the compression engine, the file layer and the UI layer.

use iced::widget::image::Handle;
use std::sync::Arc;

/// Reference-counted buffer shared by the source bytes and its preview
pub use iced::advanced::image::Bytes;

/// Suggested file name for the downloaded result
pub const DOWNLOAD_FILE_NAME: &str = "compressed_image.jpg";

/// The image the user picked
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// File name only (e.g., "IMG_0001.png")
    pub name: String,
    /// Raw file contents
    pub bytes: Bytes,
    /// Displayable preview over the same buffer as `bytes`
    pub preview: Handle,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let bytes = Bytes::from(bytes);
        Self {
            name: name.into(),
            preview: Handle::from_bytes(bytes.clone()),
            bytes,
        }
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Output of a successful engine run
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// JPEG quality (1-100) of the final encode; `None` when the source
    /// was kept because no encode came out smaller
    pub jpeg_quality: Option<u8>,
}

/// What the panel keeps after a successful run
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: Option<u8>,
}

impl CompressionResult {
    /// Size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl From<CompressedImage> for CompressionResult {
    fn from(image: CompressedImage) -> Self {
        Self {
            bytes: image.bytes.into(),
            width: image.width,
            height: image.height,
            jpeg_quality: image.jpeg_quality,
        }
    }
}

/// Whether a compression run is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    Compressing,
}

/// Quality dial, stored in tenths so it always sits on the slider grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualityLevel(u8);

impl QualityLevel {
    pub const MIN: f32 = 0.1;
    pub const MAX: f32 = 1.0;
    pub const STEP: f32 = 0.1;

    /// Snap any value to the nearest tenth within [0.1, 1.0]
    pub fn new(value: f32) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        let tenths = (value * 10.0).round().clamp(1.0, 10.0);
        Self(tenths as u8)
    }

    pub fn value(self) -> f32 {
        f32::from(self.0) / 10.0
    }
}

impl Default for QualityLevel {
    fn default() -> Self {
        Self(7)
    }
}

impl std::fmt::Display for QualityLevel {
    // Print like the slider value: "0.7", "1"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 10 {
            write!(f, "1")
        } else {
            write!(f, "0.{}", self.0)
        }
    }
}

/// Format a byte count as megabytes with two decimals ("3.00 MB")
pub fn format_megabytes(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_default() {
        assert_eq!(QualityLevel::default().value(), 0.7);
        assert_eq!(QualityLevel::default().to_string(), "0.7");
    }

    #[test]
    fn test_quality_snaps_to_grid() {
        assert_eq!(QualityLevel::new(0.30000001).value(), 0.3);
        assert_eq!(QualityLevel::new(0.44).value(), 0.4);
        assert_eq!(QualityLevel::new(0.0).value(), 0.1);
        assert_eq!(QualityLevel::new(3.0).value(), 1.0);
        assert_eq!(QualityLevel::new(f32::NAN), QualityLevel::default());
        assert_eq!(QualityLevel::new(1.0).to_string(), "1");
    }

    #[test]
    fn test_preview_shares_source_buffer() {
        let source = SourceImage::new("photo.png", vec![7u8; 4096]);

        match &source.preview {
            Handle::Bytes(_, preview) => assert_eq!(preview.as_ptr(), source.bytes.as_ptr()),
            other => panic!("unexpected preview handle: {:?}", other),
        }
        assert_eq!(source.size(), 4096);
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(3 * 1024 * 1024), "3.00 MB");
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1_572_864), "1.50 MB");
        assert_eq!(format_megabytes(250_000), "0.24 MB");
    }
}
