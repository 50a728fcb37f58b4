use super::error::{EstimatorError, Result};
use super::param_guard::ParamGuard;
use crate::linalg::SolveMethod;
use crate::Float;

/// A verified hyperparameter set ready for the fitting of a linear regression model
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegressionValidParams<F> {
    fit_intercept: bool,
    center: bool,
    solve_method: SolveMethod,
    singular_tolerance: F,
}

impl<F: Float> LinearRegressionValidParams<F> {
    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    pub fn center(&self) -> bool {
        self.center
    }

    pub fn solve_method(&self) -> SolveMethod {
        self.solve_method
    }

    pub fn singular_tolerance(&self) -> F {
        self.singular_tolerance
    }
}

/// A hyper-parameter set during construction
///
/// Configures and minimizes the following objective function:
/// ```ignore
/// ||t - Xw||^2_2
/// ```
/// in closed form, by solving the normal equation `(XᵗX) w = Xᵗt`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegressionParams<F>(LinearRegressionValidParams<F>);

impl<F: Float> Default for LinearRegressionParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure and fit a linear regression model
impl<F: Float> LinearRegressionParams<F> {
    /// Create default linear regression hyper parameters
    pub fn new() -> LinearRegressionParams<F> {
        Self(LinearRegressionValidParams {
            fit_intercept: true,
            center: false,
            solve_method: SolveMethod::default(),
            singular_tolerance: F::epsilon() * F::cast(100.),
        })
    }

    /// Whether the model prepends the constant bias column to the design
    /// matrix. Set it to `false` when the design matrix already carries it, or
    /// when the model should go through the origin.
    ///
    /// Defaults to `true` if not set.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.0.fit_intercept = fit_intercept;
        self
    }

    /// Center the features and the targets before solving for the
    /// coefficients. The intercept is recovered from the means afterwards, so
    /// the fitted model still predicts on raw inputs. Requires
    /// `fit_intercept`.
    ///
    /// Defaults to `false` if not set.
    pub fn center(mut self, center: bool) -> Self {
        self.0.center = center;
        self
    }

    /// Set the strategy used to solve the normal equation.
    ///
    /// Defaults to [`SolveMethod::Cholesky`] if not set.
    pub fn solve_method(mut self, solve_method: SolveMethod) -> Self {
        self.0.solve_method = solve_method;
        self
    }

    /// Set the relative pivot threshold below which `XᵗX` is deemed singular.
    ///
    /// Defaults to `100 * epsilon` if not set.
    pub fn singular_tolerance(mut self, singular_tolerance: F) -> Self {
        self.0.singular_tolerance = singular_tolerance;
        self
    }
}

impl<F: Float> ParamGuard for LinearRegressionParams<F> {
    type Checked = LinearRegressionValidParams<F>;
    type Error = EstimatorError;

    /// Validate the hyper parameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        let tol = self.0.singular_tolerance;
        if !tol.is_finite() || tol < F::zero() || tol >= F::one() {
            Err(EstimatorError::InvalidTolerance(
                tol.to_f32().unwrap_or(f32::NAN),
            ))
        } else if self.0.center && !self.0.fit_intercept {
            Err(EstimatorError::InvalidCentering)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
