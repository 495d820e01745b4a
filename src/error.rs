use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Landmark index {index} out of range for a set of {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?} (width, height)")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Failures of the geometry kernel.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("lines are parallel or coincident")]
    ParallelLines,

    #[error("intersection lies outside the representable coordinate range")]
    OutOfRange,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with `DimensionMismatch` unless both shapes agree.
pub(crate) fn check_dimensions(expected: (u32, u32), actual: (u32, u32)) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(())
}
