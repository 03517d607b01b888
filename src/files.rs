/// Reading the picked image and writing the compressed one

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::FileError;
use crate::state::data::SourceImage;

/// Extensions offered by the file picker
pub const IMAGE_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico",
];

/// Load a picked file into a `SourceImage`
pub async fn load_source(path: PathBuf) -> Result<SourceImage, FileError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| FileError::read(&path, e))?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(SourceImage::new(name, bytes))
}

/// Write the compressed image, returning where it went
pub async fn save_result(path: PathBuf, bytes: std::sync::Arc<[u8]>) -> Result<PathBuf, FileError> {
    tokio::fs::write(&path, &*bytes)
        .await
        .map_err(|e| FileError::write(&path, e))?;

    info!("💾 Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// Whether a path looks like something the picker would offer
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compressed_image.jpg");
        let bytes: Arc<[u8]> = Arc::from(&[0xFF, 0xD8, 0xFF, 0xD9][..]);

        let saved = save_result(path.clone(), Arc::clone(&bytes)).await.unwrap();
        assert_eq!(saved, path);

        let source = load_source(path).await.unwrap();
        assert_eq!(source.name, "compressed_image.jpg");
        assert_eq!(&*source.bytes, &*bytes);
        assert_eq!(source.size(), 4);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_source(dir.path().join("missing.png")).await;
        assert!(matches!(result, Err(FileError::Read { .. })));
    }

    #[tokio::test]
    async fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("out.jpg");
        let result = save_result(path, Arc::from(&[1u8][..])).await;
        assert!(matches!(result, Err(FileError::Write { .. })));
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("/tmp/Photo.JPG")));
        assert!(is_image_path(Path::new("scan.tiff")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("README")));
    }
}
