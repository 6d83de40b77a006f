use std::io;
use thiserror::Error;

/// Errors that can occur while drawing, persisting or rendering a buffer
#[derive(Error, Debug)]
pub enum RetroError {
    /// A color index, palette selector or cell coordinate outside its domain
    #[error("{what} {value} is out of range (must be below {limit})")]
    OutOfRange {
        what: &'static str,
        value: i64,
        limit: i64,
    },

    /// A persisted document failed structural or value validation
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Error related to IO operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The raster encoder rejected the image or the requested format
    #[error("Image encoding error: {0}")]
    Image(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RetroError {
    pub(crate) fn out_of_range(what: &'static str, value: impl Into<i64>, limit: impl Into<i64>) -> Self {
        Self::OutOfRange {
            what,
            value: value.into(),
            limit: limit.into(),
        }
    }

    /// Whether this error belongs to the I/O family (file access or encoding)
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Image(_))
    }
}

impl From<image::ImageError> for RetroError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Self::Io(e),
            other => Self::Image(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for RetroError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return Self::Io(io::Error::other(err.to_string()));
        }
        Self::MalformedDocument(err.to_string())
    }
}

/// Type alias for Result with `RetroError`
pub type Result<T> = std::result::Result<T, RetroError>;
