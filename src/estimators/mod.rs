#[cfg(test)]
mod tests;

pub mod error;
pub mod hyperparams;
pub mod linear_regression;
pub mod normal_equation;
pub mod param_guard;
pub mod pipeline;
pub mod simple;
pub mod traits;

pub use error::{EstimatorError, Result};
pub use hyperparams::{LinearRegressionParams, LinearRegressionValidParams};
pub use linear_regression::LinearRegression;
pub use normal_equation::{normal_equation, normal_equation_centered};
pub use param_guard::ParamGuard;
pub use pipeline::{Pipeline, PipelineParams};
pub use simple::SimpleLinearRegression;
pub use traits::{Fit, Predict};
