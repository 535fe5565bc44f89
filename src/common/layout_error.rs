use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the depth layout pipeline.
///
/// Zero-area boxes are not represented here; they are excluded per object
/// (see [`ObjectDepth::excluded`](crate::compositing::ObjectDepth)).
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("no cached depth map for `{filename}`")]
    MissingDepthMap { filename: String },

    #[error("depth map shape {found:?} does not match layout shape {expected:?} (height, width)")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("invalid depth convention: {0}")]
    InvalidDepthConvention(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("layout has {count} valid objects, at most {max} allowed")]
    TooManyObjects { count: usize, max: usize },

    #[error("failed to decode depth map {path}: {source}")]
    DepthDecode {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    #[error("failed to encode depth map {path}: {source}")]
    DepthEncode {
        path: PathBuf,
        #[source]
        source: ndarray_npy::WriteNpyError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
