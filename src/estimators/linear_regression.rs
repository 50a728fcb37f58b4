use log::debug;
use ndarray::{s, Array1, ArrayBase, ArrayView1, Data, Ix1, Ix2, OwnedRepr, ViewRepr};

use super::error::{EstimatorError, Result};
use super::hyperparams::{LinearRegressionParams, LinearRegressionValidParams};
use super::normal_equation::{normal_equation, normal_equation_centered};
use super::traits::{Fit, Predict};
use crate::datasets::{DatasetBase, DesignMatrix, Targets};
use crate::helpers::helpers::add_bias_column;
use crate::helpers::metrics::r2_score;
use crate::Float;

/// The ordinary least squares estimator
///
/// A fitted linear regression model. Its weights are computed once, in closed
/// form, by [`Fit::fit`] and never change afterwards: refitting yields a new
/// model.
///
/// When the model has an intercept, `weights()[0]` is the bias and
/// `weights()[1..]` the per-feature coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression<F> {
    weights: ArrayBase<OwnedRepr<F>, Ix1>,
    fit_intercept: bool,
}

impl<F: Float> LinearRegression<F> {
    /// This method instantiates linear regression hyperparameters with default
    /// values.
    pub fn params() -> LinearRegressionParams<F> {
        LinearRegressionParams::new()
    }

    /// This method is a getter for the full weight vector.
    pub fn weights(&self) -> ArrayBase<ViewRepr<&F>, Ix1> {
        self.weights.view()
    }

    /// Whether the first weight is a bias term.
    pub fn has_intercept(&self) -> bool {
        self.fit_intercept
    }

    /// The bias term, zero for a model fitted without intercept.
    pub fn intercept(&self) -> F {
        if self.fit_intercept {
            self.weights[0]
        } else {
            F::zero()
        }
    }

    /// The per-feature coefficients, without the bias term.
    pub fn coefficients(&self) -> ArrayView1<'_, F> {
        if self.fit_intercept {
            self.weights.slice(s![1..])
        } else {
            self.weights.view()
        }
    }

    /// Number of columns expected from a design matrix at prediction time.
    pub fn n_features(&self) -> usize {
        self.coefficients().len()
    }

    /// Predicts the target of a single query `x_q`, computing `wᵗx_q`.
    ///
    /// The query either has one entry per weight, the leading one being the
    /// constant 1 of the bias column, or, for a model with intercept, one entry
    /// per feature, in which case the bias is added here.
    pub fn predict_one(&self, x_q: ArrayView1<F>) -> Result<F> {
        let n_weights = self.weights.len();
        if x_q.len() == n_weights {
            Ok(self.weights.dot(&x_q))
        } else if self.fit_intercept && x_q.len() + 1 == n_weights {
            Ok(self.intercept() + self.coefficients().dot(&x_q))
        } else {
            Err(EstimatorError::DimensionMismatch {
                expected: n_weights,
                found: x_q.len(),
            })
        }
    }

    /// Computes the residuals `t - Xw` over a dataset laid out like the
    /// training one.
    pub fn residuals<DM, T>(&self, dataset: &DatasetBase<DM, T>) -> Result<Array1<F>>
    where
        DM: DesignMatrix<Elem = F>,
        T: Targets<Elem = F>,
    {
        dataset.check()?;
        let (X, t) = dataset.views();
        let y = self.predict(&X)?;
        Ok(&t - &y)
    }

    /// Returns the coefficient of determination `R²` of the predictions over
    /// a dataset.
    pub fn score<DM, T>(&self, dataset: &DatasetBase<DM, T>) -> Result<F>
    where
        DM: DesignMatrix<Elem = F>,
        T: Targets<Elem = F>,
    {
        dataset.check()?;
        let (X, t) = dataset.views();
        let y = self.predict(&X)?;
        r2_score(t, y.view())
    }
}

impl<F: Float> LinearRegressionValidParams<F> {
    /// Checks, in this order, that the shapes agree, that there are at least
    /// as many observations as unknowns and that every entry is finite.
    pub(crate) fn check_dataset<DM, T>(&self, dataset: &DatasetBase<DM, T>) -> Result<()>
    where
        DM: DesignMatrix<Elem = F>,
        T: Targets<Elem = F>,
    {
        dataset.check_shapes()?;
        let n_samples = dataset.n_samples();
        let n_unknowns = dataset.n_features() + usize::from(self.fit_intercept());
        if n_samples == 0 || n_samples < n_unknowns {
            return Err(EstimatorError::InsufficientData {
                samples: n_samples,
                required: n_unknowns.max(1),
            });
        }
        dataset.check()
    }
}

/// This implements the closed-form least squares fit for dense design
/// matrices.
impl<F: Float, S: Data<Elem = F>, T: Targets<Elem = F>>
    Fit<ArrayBase<S, Ix2>, T, EstimatorError> for LinearRegressionValidParams<F>
{
    /// If successful, the output is an instance of [`LinearRegression`]
    /// containing the fitted weights.
    type Object = LinearRegression<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, T>) -> Result<Self::Object> {
        self.check_dataset(dataset)?;
        let (X, t) = dataset.views();
        debug!(
            "fitting linear regression on {}x{} design matrix (intercept: {}, centered: {})",
            X.nrows(),
            X.ncols(),
            self.fit_intercept(),
            self.center()
        );

        let weights = if !self.fit_intercept() {
            normal_equation(X, t, self.solve_method(), self.singular_tolerance())?
        } else if self.center() {
            normal_equation_centered(X, t, self.solve_method(), self.singular_tolerance())?
        } else {
            let X_bias = add_bias_column(X);
            normal_equation(
                X_bias.view(),
                t,
                self.solve_method(),
                self.singular_tolerance(),
            )?
        };

        Ok(LinearRegression {
            weights,
            fit_intercept: self.fit_intercept(),
        })
    }
}

/// Batch prediction over a dense design matrix with the training column
/// layout.
impl<F: Float, S: Data<Elem = F>> Predict<ArrayBase<S, Ix2>, EstimatorError>
    for LinearRegression<F>
{
    type Output = Array1<F>;

    fn predict(&self, design_matrix: &ArrayBase<S, Ix2>) -> Result<Array1<F>> {
        let n_features = self.n_features();
        if design_matrix.ncols() != n_features {
            return Err(EstimatorError::DimensionMismatch {
                expected: n_features,
                found: design_matrix.ncols(),
            });
        }
        Ok(design_matrix.dot(&self.coefficients()) + self.intercept())
    }
}
