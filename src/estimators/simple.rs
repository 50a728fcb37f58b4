use ndarray::{Array1, ArrayView1};

use super::error::{EstimatorError, Result};
use crate::helpers::helpers::all_finite;
use crate::Float;

/// Single-variable regression fitted on centered data.
///
/// With `x̄` and `t̄` the means of the inputs and targets, the model is
/// `y - t̄ = w (x - x̄)` and the slope has the closed form
/// `w = Σ(x - x̄)(t - t̄) / Σ(x - x̄)²`. Predictions undo the centering:
/// `y_q = w (x_q - x̄) + t̄`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleLinearRegression<F> {
    slope: F,
    x_mean: F,
    t_mean: F,
}

impl<F: Float> SimpleLinearRegression<F> {
    /// Fits the slope and the means from paired inputs and targets.
    pub fn fit(x: ArrayView1<F>, t: ArrayView1<F>) -> Result<Self> {
        if x.len() != t.len() {
            return Err(EstimatorError::DimensionMismatch {
                expected: x.len(),
                found: t.len(),
            });
        }
        if x.len() < 2 {
            return Err(EstimatorError::InsufficientData {
                samples: x.len(),
                required: 2,
            });
        }
        if !all_finite(x.iter()) || !all_finite(t.iter()) {
            return Err(EstimatorError::NonFiniteInput);
        }

        let n_samples = F::cast(x.len());
        let x_mean = x.sum() / n_samples;
        let t_mean = t.sum() / n_samples;

        let xc = x.mapv(|xi| xi - x_mean);
        let tc = t.mapv(|ti| ti - t_mean);
        let sxx = xc.dot(&xc);
        // Constant inputs leave nothing to regress on.
        if sxx <= F::epsilon() * x.dot(&x) {
            return Err(EstimatorError::SingularSystem {
                index: 0,
                pivot: sxx.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(SimpleLinearRegression {
            slope: xc.dot(&tc) / sxx,
            x_mean,
            t_mean,
        })
    }

    /// Slope of the fitted line.
    pub fn slope(&self) -> F {
        self.slope
    }

    /// Intercept of the line in the original, uncentered coordinates.
    pub fn intercept(&self) -> F {
        self.t_mean - self.slope * self.x_mean
    }

    /// Mean of the training inputs.
    pub fn x_mean(&self) -> F {
        self.x_mean
    }

    /// Mean of the training targets.
    pub fn t_mean(&self) -> F {
        self.t_mean
    }

    /// Predicts the target of a single input.
    pub fn predict_one(&self, x_q: F) -> F {
        self.slope * (x_q - self.x_mean) + self.t_mean
    }

    /// Predicts the targets of a batch of inputs.
    pub fn predict(&self, x: ArrayView1<F>) -> Array1<F> {
        x.mapv(|xq| self.predict_one(xq))
    }
}
