use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by import, export and configuration loading.
///
/// None of these leave the document or history in a modified state.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The background image could not be read or decoded
    #[error("failed to load background image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The composited canvas could not be encoded or written
    #[error("failed to export canvas to {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Export was requested for a canvas with a zero dimension
    #[error("cannot export an empty canvas ({width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type CanvasResult<T> = Result<T, CanvasError>;
