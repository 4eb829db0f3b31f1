use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HdrError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load image {path}: {message}")]
    ImageLoad { path: PathBuf, message: String },

    #[error("Failed to save image {path}: {message}")]
    ImageSave { path: PathBuf, message: String },

    #[error(
        "Image {path} is {}x{}, expected {}x{} like the first image of the stack",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Image {path} has {channels} channel(s), channel {channel} requested")]
    MissingChannel {
        path: PathBuf,
        channel: usize,
        channels: usize,
    },

    #[error("Response curve needs exactly 256 values, got {0}")]
    CurveLength(usize),

    #[error("Invalid response curve {path} at line {line}: {reason}")]
    CurveFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Least-squares solve failed: {0}")]
    Solve(String),

    #[error("Invalid matte: {0}")]
    Matte(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No pixels selected for fusion")]
    EmptySelection,
}

impl HdrError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HdrError>;
