/// Compression settings
///
/// These values configure the compression engine. They are read from a
/// JSON file in the user's config directory at startup; every field is
/// optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::SettingsError;

/// Engine options for a single compression run
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CompressionOptions {
    /// Target maximum output size in megabytes
    pub max_size_mb: f64,
    /// Longest allowed edge in pixels; larger images are downscaled
    pub max_width_or_height: u32,
    /// Offload the work to the blocking thread pool
    pub use_parallel_execution: bool,
    /// Requested quality (0.1 to 1.0)
    pub quality: f32,
    /// Re-encode attempts allowed while the output is over `max_size_mb`
    pub max_iterations: u32,
}

impl CompressionOptions {
    /// Size budget in bytes
    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb * 1024.0 * 1024.0) as u64
    }
}

/// User-configurable compression settings
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CompressionSettings {
    /// Target maximum output size in megabytes (default 1.0)
    pub max_size_mb: f64,

    /// Longest allowed edge in pixels (default 1920)
    pub max_width_or_height: u32,

    /// Run compression on the blocking pool (default true)
    pub use_parallel_execution: bool,

    /// Initial slider position (default 0.7)
    pub default_quality: f32,

    /// Re-encode attempts when over budget (default 10)
    pub max_iterations: u32,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            max_size_mb: 1.0,
            max_width_or_height: 1920,
            use_parallel_execution: true,
            default_quality: 0.7,
            max_iterations: 10,
        }
    }
}

impl CompressionSettings {
    /// Convert to JSON string for the settings file
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Write settings to a file, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read settings from `path`, falling back to defaults.
    ///
    /// A missing file is normal and silent; anything else is logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => {
                debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Like `load_or_default`, but a missing file is created with the
    /// defaults so it can be edited. A failed write is logged and ignored.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::load_or_default(path);
        }

        let settings = Self::default();
        match settings.save(path) {
            Ok(()) => info!("📁 Wrote default settings to {}", path.display()),
            Err(e) => warn!("⚠️  Could not write {}: {}", path.display(), e),
        }
        settings
    }

    /// Get the path where the settings file lives
    /// - Linux: ~/.config/image-compressor/settings.json
    /// - macOS: ~/Library/Application Support/image-compressor/settings.json
    /// - Windows: %APPDATA%\image-compressor\settings.json
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("image-compressor");
        path.push("settings.json");
        Some(path)
    }

    /// Build the engine options for one run at the given quality
    pub fn options(&self, quality: f32) -> CompressionOptions {
        CompressionOptions {
            max_size_mb: self.max_size_mb,
            max_width_or_height: self.max_width_or_height,
            use_parallel_execution: self.use_parallel_execution,
            quality,
            max_iterations: self.max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_workflow() {
        let settings = CompressionSettings::default();
        let options = settings.options(0.7);

        assert_eq!(options.max_size_mb, 1.0);
        assert_eq!(options.max_width_or_height, 1920);
        assert!(options.use_parallel_execution);
        assert_eq!(options.quality, 0.7);
        assert_eq!(options.max_size_bytes(), 1024 * 1024);
    }

    #[test]
    fn test_serialization() {
        let mut settings = CompressionSettings::default();
        settings.max_width_or_height = 1280;
        settings.use_parallel_execution = false;

        let json = settings.to_json().unwrap();
        let restored = CompressionSettings::from_json(&json).unwrap();

        assert_eq!(settings, restored);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = CompressionSettings::from_json(r#"{ "max_size_mb": 0.5 }"#).unwrap();

        assert_eq!(settings.max_size_mb, 0.5);
        assert_eq!(settings.max_width_or_height, 1920);
        assert_eq!(settings.default_quality, 0.7);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image-compressor").join("settings.json");

        let mut settings = CompressionSettings::default();
        settings.default_quality = 0.4;
        settings.save(&path).unwrap();

        assert_eq!(CompressionSettings::load(&path).unwrap(), settings);
        assert_eq!(CompressionSettings::load_or_default(&path), settings);
    }

    #[test]
    fn test_init_writes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image-compressor").join("settings.json");

        let settings = CompressionSettings::load_or_init(&path);

        assert_eq!(settings, CompressionSettings::default());
        assert!(path.exists());
        assert_eq!(CompressionSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "max_width_or_height": 800 }"#).unwrap();

        let settings = CompressionSettings::load_or_init(&path);

        assert_eq!(settings.max_width_or_height, 800);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{ "max_width_or_height": 800 }"#
        );
    }

    #[test]
    fn test_init_unwritable_path_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        // Parent is a regular file, so the directory cannot be created
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("settings.json");

        let settings = CompressionSettings::load_or_init(&path);

        assert_eq!(settings, CompressionSettings::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CompressionSettings::load_or_default(&dir.path().join("nope.json"));
        assert_eq!(settings, CompressionSettings::default());
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        assert!(matches!(
            CompressionSettings::load(file.path()),
            Err(SettingsError::Parse(_))
        ));
        assert_eq!(
            CompressionSettings::load_or_default(file.path()),
            CompressionSettings::default()
        );
    }
}
