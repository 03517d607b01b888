//! Error types for the image compressor.
//!
//! Engine errors travel inside iced messages, so they carry their detail as
//! strings and stay `Clone`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single compression run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompressError {
    /// Input bytes are not an image the decoder understands
    #[error("Decode error: {0}")]
    Decode(String),

    /// JPEG encoding failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Encoder produced zero bytes
    #[error("Encoder produced an empty image")]
    EmptyOutput,

    /// The blocking worker panicked or was cancelled
    #[error("Worker error: {0}")]
    Worker(String),
}

impl CompressError {
    pub fn decode<T: ToString>(err: T) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn encode<T: ToString>(err: T) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Errors reading the source image or writing the compressed one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

impl FileError {
    pub fn read(path: impl Into<PathBuf>, err: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, err: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

/// Errors loading the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
