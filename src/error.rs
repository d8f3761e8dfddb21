use std::path::PathBuf;
use thiserror::Error;

/// The main error type for voc2yolo operations.
#[derive(Debug, Error)]
pub enum Voc2YoloError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse VOC XML {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Invalid bounding box in {path} (object {object_index}): {message}")]
    InvalidBox {
        path: PathBuf,
        object_index: usize,
        message: String,
    },

    #[error("Invalid image size {width}x{height} in {path} (must be positive)")]
    InvalidImageSize {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("Invalid class registry: {0}")]
    InvalidClassRegistry(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("{} split(s) failed: {}", .failed.len(), .failed.join(", "))]
    SplitsFailed { failed: Vec<String> },
}

impl Voc2YoloError {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Voc2YoloError::Io { path, source }
    }
}
