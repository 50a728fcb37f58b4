//! Data conditioning applied before fitting.
//!
//! Every transformer learns its statistics once, from training data, and can
//! then be applied to any dataset with the same number of columns.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_stats::SummaryStatisticsExt;

use crate::estimators::error::{EstimatorError, Result};
use crate::Float;


mod power_transformer;

pub use power_transformer::{
    fit_lambda, yeo_johnson, yeo_johnson_inverse, yeo_johnson_log_likelihood, PowerTransformer,
    PowerTransformerParams,
};

/// A preprocessing step fitted on training data and applied unchanged to new
/// data.
pub trait Transformer<F> {
    fn transform(&self, X: ArrayView2<F>) -> Result<Array2<F>>;
}

/// Hyperparameters of a preprocessing step, able to fit it on a design
/// matrix.
pub trait FitTransformer<F> {
    type Object: Transformer<F>;

    fn fit_transformer(&self, X: ArrayView2<F>) -> Result<Self::Object>;
}

fn check_columns(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(EstimatorError::DimensionMismatch { expected, found });
    }
    Ok(())
}

fn column_means<F: Float>(X: ArrayView2<F>) -> Result<Array1<F>> {
    X.mean_axis(Axis(0)).ok_or(EstimatorError::InsufficientData {
        samples: 0,
        required: 1,
    })
}

/// Mean removal for predictors and targets.
///
/// Centering shifts every column of the design matrix and the targets so
/// that their means are zero. A model fitted on centered data has no
/// intercept; predictions on raw inputs must subtract the feature means from
/// the query and add the target mean back.
#[derive(Debug, Clone, PartialEq)]
pub struct Centering<F> {
    feature_means: Array1<F>,
    target_mean: F,
}

impl<F: Float> Centering<F> {
    /// Learns the column means of `X` (without bias column) and the mean of
    /// `t`.
    pub fn fit(X: ArrayView2<F>, t: ArrayView1<F>) -> Result<Self> {
        if X.nrows() != t.len() {
            return Err(EstimatorError::DimensionMismatch {
                expected: X.nrows(),
                found: t.len(),
            });
        }
        let target_mean =
            SummaryStatisticsExt::mean(&t).map_err(|_| EstimatorError::InsufficientData {
                samples: 0,
                required: 1,
            })?;
        Ok(Centering {
            feature_means: column_means(X)?,
            target_mean,
        })
    }

    pub fn feature_means(&self) -> ArrayView1<'_, F> {
        self.feature_means.view()
    }

    pub fn target_mean(&self) -> F {
        self.target_mean
    }

    pub fn center_features(&self, X: ArrayView2<F>) -> Result<Array2<F>> {
        check_columns(self.feature_means.len(), X.ncols())?;
        Ok(&X - &self.feature_means)
    }

    pub fn center_targets(&self, t: ArrayView1<F>) -> Array1<F> {
        t.mapv(|ti| ti - self.target_mean)
    }

    /// Maps predictions made in centered coordinates back to target units.
    pub fn decenter_targets(&self, y: ArrayView1<F>) -> Array1<F> {
        y.mapv(|yi| yi + self.target_mean)
    }

    /// Predicts on a raw query with slopes fitted on centered data:
    /// `w·(x_q - x̄) + t̄`.
    pub fn decenter_prediction(&self, slopes: ArrayView1<F>, x_q: ArrayView1<F>) -> Result<F> {
        check_columns(self.feature_means.len(), slopes.len())?;
        check_columns(self.feature_means.len(), x_q.len())?;
        let shifted = &x_q - &self.feature_means;
        Ok(slopes.dot(&shifted) + self.target_mean)
    }

    /// Intercept of the equivalent uncentered model: `t̄ - w·x̄`.
    pub fn intercept_for(&self, slopes: ArrayView1<F>) -> Result<F> {
        check_columns(self.feature_means.len(), slopes.len())?;
        Ok(self.target_mean - slopes.dot(&self.feature_means))
    }
}

/// Standardization to zero mean and unit variance, column by column.
///
/// The variance is the population variance (no degrees of freedom
/// correction). Constant columns keep a unit scale so that they are only
/// shifted.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler<F> {
    mean: Array1<F>,
    variance: Array1<F>,
    scale: Array1<F>,
}

impl<F: Float> StandardScaler<F> {
    pub fn fit(X: ArrayView2<F>) -> Result<Self> {
        if X.nrows() == 0 {
            return Err(EstimatorError::InsufficientData {
                samples: 0,
                required: 1,
            });
        }
        let mean = column_means(X)?;
        let variance = X.var_axis(Axis(0), F::zero());
        let scale = variance.mapv(|v| if v > F::zero() { v.sqrt() } else { F::one() });
        Ok(StandardScaler {
            mean,
            variance,
            scale,
        })
    }

    pub fn mean(&self) -> ArrayView1<'_, F> {
        self.mean.view()
    }

    pub fn variance(&self) -> ArrayView1<'_, F> {
        self.variance.view()
    }

    pub fn scale(&self) -> ArrayView1<'_, F> {
        self.scale.view()
    }

    pub fn transform(&self, X: ArrayView2<F>) -> Result<Array2<F>> {
        check_columns(self.mean.len(), X.ncols())?;
        Ok((&X - &self.mean) / &self.scale)
    }

    pub fn inverse_transform(&self, X: ArrayView2<F>) -> Result<Array2<F>> {
        check_columns(self.mean.len(), X.ncols())?;
        Ok(&X * &self.scale + &self.mean)
    }
}

impl<F: Float> Transformer<F> for StandardScaler<F> {
    fn transform(&self, X: ArrayView2<F>) -> Result<Array2<F>> {
        StandardScaler::transform(self, X)
    }
}

/// Builds a [`StandardScaler`] inside a pipeline. The scaler has no
/// hyperparameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardScalerParams;

impl<F: Float> FitTransformer<F> for StandardScalerParams {
    type Object = StandardScaler<F>;

    fn fit_transformer(&self, X: ArrayView2<F>) -> Result<StandardScaler<F>> {
        StandardScaler::fit(X)
    }
}
