use log::debug;
use ndarray::{Array1, ArrayBase, Data, Ix2};

use super::error::{EstimatorError, Result};
use super::hyperparams::LinearRegressionParams;
use super::linear_regression::LinearRegression;
use super::param_guard::ParamGuard;
use super::traits::{Fit, Predict};
use crate::datasets::{DatasetBase, DesignMatrix, Targets};
use crate::helpers::metrics::r2_score;
use crate::preprocessing::{FitTransformer, Transformer};
use crate::Float;

/// A preprocessing step chained with a linear regression
///
/// Fitting learns the step on the training design matrix, transforms it and
/// fits the regression on the result. Prediction and scoring apply the same
/// fitted step to new data first, so test data can never skip it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline<T, F> {
    transformer: T,
    regressor: LinearRegression<F>,
}

impl<T: Transformer<F>, F: Float> Pipeline<T, F> {
    /// The fitted preprocessing step.
    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    /// The regression fitted on the transformed design matrix.
    pub fn regressor(&self) -> &LinearRegression<F> {
        &self.regressor
    }

    /// Returns the coefficient of determination `R²` of the predictions over
    /// a dataset with raw, untransformed predictors.
    pub fn score<DM, Y>(&self, dataset: &DatasetBase<DM, Y>) -> Result<F>
    where
        DM: DesignMatrix<Elem = F>,
        Y: Targets<Elem = F>,
    {
        dataset.check()?;
        let (X, t) = dataset.views();
        let y = self.predict(&X)?;
        r2_score(t, y.view())
    }
}

/// Hyperparameters of a [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParams<P, F> {
    transformer: P,
    regressor: LinearRegressionParams<F>,
}

impl<P, F: Float> PipelineParams<P, F> {
    /// Chains the preprocessing step configured by `transformer` with a
    /// linear regression using default hyperparameters.
    pub fn new(transformer: P) -> Self {
        PipelineParams {
            transformer,
            regressor: LinearRegressionParams::new(),
        }
    }

    /// Replaces the hyperparameters of the final regression.
    pub fn regressor(mut self, regressor: LinearRegressionParams<F>) -> Self {
        self.regressor = regressor;
        self
    }
}

impl<F, S, T, P> Fit<ArrayBase<S, Ix2>, T, EstimatorError> for PipelineParams<P, F>
where
    F: Float,
    S: Data<Elem = F>,
    T: Targets<Elem = F>,
    P: FitTransformer<F>,
{
    type Object = Pipeline<P::Object, F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, T>) -> Result<Self::Object> {
        let params = self.regressor.check_ref()?;
        params.check_dataset(dataset)?;
        let (X, t) = dataset.views();

        let transformer = self.transformer.fit_transformer(X)?;
        let X_transformed = transformer.transform(X)?;
        debug!(
            "pipeline: fitted preprocessing on {}x{} design matrix",
            X.nrows(),
            X.ncols()
        );
        let regressor = params.fit(&DatasetBase::new(X_transformed.view(), t))?;

        Ok(Pipeline {
            transformer,
            regressor,
        })
    }
}

/// Batch prediction over raw predictors with the training column layout.
impl<T, F, S> Predict<ArrayBase<S, Ix2>, EstimatorError> for Pipeline<T, F>
where
    T: Transformer<F>,
    F: Float,
    S: Data<Elem = F>,
{
    type Output = Array1<F>;

    fn predict(&self, design_matrix: &ArrayBase<S, Ix2>) -> Result<Array1<F>> {
        let X_transformed = self.transformer.transform(design_matrix.view())?;
        self.regressor.predict(&X_transformed)
    }
}
