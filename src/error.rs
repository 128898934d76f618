use thiserror::Error;

/// Everything that can go wrong when building, indexing or combining arrays.
/// Validation always happens before any cell is written, so an `Err` never
/// leaves an array half-updated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TensorError {
    #[error("shape dimensions must have a strictly positive width, got {dims:?}")]
    InvalidShape { dims: Vec<isize> },

    #[error("shape mismatch: {reason}")]
    ShapeMismatch { reason: String },

    #[error("index ({row}, {col}) out of bounds for a {height}x{width} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("{permutation:?} is not a valid permutation")]
    InvalidPermutation { permutation: Vec<usize> },

    #[error("cannot store a {found} value in a {expected} slot")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("axis {axis} is out of range for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("integer division by zero")]
    DivisionByZero,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, TensorError>;

impl TensorError {
    pub(crate) fn mismatch(reason: impl Into<String>) -> Self {
        TensorError::ShapeMismatch { reason: reason.into() }
    }

    pub(crate) fn invalid_shape(dims: &[usize]) -> Self {
        TensorError::InvalidShape { dims: dims.iter().map(|&d| d as isize).collect() }
    }
}
