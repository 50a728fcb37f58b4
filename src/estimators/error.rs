use crate::linalg::LinalgError;
use thiserror::Error;

/// Simplified `Result` using [`EstimatorError`](crate::estimators::error::EstimatorError) as error type
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Error variants from hyperparameter construction or model estimation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    /// `XᵗX` is singular or too ill-conditioned to be solved
    #[error("singular system: pivot {pivot} at index {index} is below tolerance")]
    SingularSystem { index: usize, pivot: f64 },
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// The input has not enough samples
    #[error("insufficient data: {samples} samples for {required} parameters")]
    InsufficientData { samples: usize, required: usize },
    #[error("input contains NaN or infinite values")]
    NonFiniteInput,
    #[error("invalid tolerance {0}")]
    InvalidTolerance(f32),
    #[error("centering requires the model to fit an intercept")]
    InvalidCentering,
    #[error("invalid test size {0}")]
    InvalidTestSize(f32),
}

impl From<LinalgError> for EstimatorError {
    fn from(err: LinalgError) -> Self {
        match err {
            LinalgError::Singular { index, pivot } => {
                EstimatorError::SingularSystem { index, pivot }
            }
            LinalgError::NotSquare { rows, cols } => EstimatorError::DimensionMismatch {
                expected: rows,
                found: cols,
            },
            LinalgError::DimensionMismatch { expected, found } => {
                EstimatorError::DimensionMismatch { expected, found }
            }
        }
    }
}
