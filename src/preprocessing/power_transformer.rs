use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::{check_columns, FitTransformer, StandardScaler, Transformer};
use crate::estimators::error::{EstimatorError, Result};
use crate::helpers::helpers::all_finite;
use crate::Float;

/// Interval searched for the exponent of each column.
const LAMBDA_BOUNDS: (f64, f64) = (-3., 3.);
const MAX_ITER: usize = 100;
const LAMBDA_TOL: f64 = 1e-8;

/// Yeo-Johnson transform of a single value.
///
/// ```ignore
/// x >= 0, λ != 0:  ((x + 1)^λ - 1) / λ
/// x >= 0, λ == 0:  ln(x + 1)
/// x <  0, λ != 2:  -((1 - x)^(2 - λ) - 1) / (2 - λ)
/// x <  0, λ == 2:  -ln(1 - x)
/// ```
pub fn yeo_johnson<F: Float>(x: F, lambda: F) -> F {
    let two = F::cast(2.);
    if x >= F::zero() {
        if lambda.abs() < F::epsilon() {
            x.ln_1p()
        } else {
            ((x + F::one()).powf(lambda) - F::one()) / lambda
        }
    } else if (lambda - two).abs() < F::epsilon() {
        -(-x).ln_1p()
    } else {
        let p = two - lambda;
        -(((F::one() - x).powf(p) - F::one()) / p)
    }
}

/// Inverse of [`yeo_johnson`]. The transform preserves the sign, so the
/// branch is picked from `y`.
pub fn yeo_johnson_inverse<F: Float>(y: F, lambda: F) -> F {
    let two = F::cast(2.);
    if y >= F::zero() {
        if lambda.abs() < F::epsilon() {
            y.exp_m1()
        } else {
            (y * lambda + F::one()).powf(F::one() / lambda) - F::one()
        }
    } else if (lambda - two).abs() < F::epsilon() {
        -(-y).exp_m1()
    } else {
        let p = two - lambda;
        F::one() - (F::one() - p * y).powf(F::one() / p)
    }
}

/// Profile log-likelihood of `λ` for one column, assuming the transformed
/// values are Gaussian:
/// `-n/2 ln(var(ψ(x, λ))) + (λ - 1) Σ sign(x) ln(|x| + 1)`.
///
/// Returns `-∞` when the transformed column has no finite positive variance.
pub fn yeo_johnson_log_likelihood<F: Float>(x: ArrayView1<F>, lambda: F) -> F {
    let n_samples = F::cast(x.len());
    let transformed = x.mapv(|xi| yeo_johnson(xi, lambda));
    let variance = transformed.var(F::zero());
    if !(variance > F::zero() && variance.is_finite()) {
        return F::neg_infinity();
    }
    let jacobian: F = x.iter().map(|&xi| xi.signum() * xi.abs().ln_1p()).sum();
    let ll = -n_samples / F::cast(2.) * variance.ln() + (lambda - F::one()) * jacobian;
    if ll.is_nan() {
        F::neg_infinity()
    } else {
        ll
    }
}

/// Golden-section search for the maximum of `f` over `[lower, upper]`.
fn golden_section_max<F: Float>(f: impl Fn(F) -> F, lower: F, upper: F) -> F {
    let inv_phi = F::cast((5f64.sqrt() - 1.) / 2.);
    let tol = F::cast(LAMBDA_TOL);
    let (mut a, mut b) = (lower, upper);
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let (mut fc, mut fd) = (f(c), f(d));

    for _ in 0..MAX_ITER {
        if b - a < tol {
            break;
        }
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d);
        }
    }
    (a + b) / F::cast(2.)
}

/// Maximum likelihood estimate of the Yeo-Johnson exponent of one column.
/// A constant column has no likelihood to maximize and keeps `λ = 1`, the
/// identity.
pub fn fit_lambda<F: Float>(x: ArrayView1<F>) -> F {
    if x.var(F::zero()) == F::zero() {
        return F::one();
    }
    golden_section_max(
        |lambda| yeo_johnson_log_likelihood(x.view(), lambda),
        F::cast(LAMBDA_BOUNDS.0),
        F::cast(LAMBDA_BOUNDS.1),
    )
}

/// Hyperparameters of a [`PowerTransformer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerTransformerParams {
    standardize: bool,
}

impl Default for PowerTransformerParams {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerTransformerParams {
    pub fn new() -> Self {
        PowerTransformerParams { standardize: true }
    }

    /// Rescale the transformed columns to zero mean and unit variance.
    ///
    /// Defaults to `true` if not set.
    pub fn standardize(mut self, standardize: bool) -> Self {
        self.standardize = standardize;
        self
    }

    /// Fits one exponent per column of `X` by maximum likelihood, then the
    /// standardization of the transformed columns if requested.
    pub fn fit<F: Float>(&self, X: ArrayView2<F>) -> Result<PowerTransformer<F>> {
        if X.nrows() == 0 {
            return Err(EstimatorError::InsufficientData {
                samples: 0,
                required: 1,
            });
        }
        if !all_finite(X.iter()) {
            return Err(EstimatorError::NonFiniteInput);
        }

        let lambdas: Array1<F> = X.axis_iter(Axis(1)).map(fit_lambda).collect();
        debug!("yeo-johnson exponents: {}", lambdas);

        let mut transformer = PowerTransformer {
            lambdas,
            scaler: None,
        };
        if self.standardize {
            let transformed = transformer.power_transform(X)?;
            transformer.scaler = Some(StandardScaler::fit(transformed.view())?);
        }
        Ok(transformer)
    }
}

impl<F: Float> FitTransformer<F> for PowerTransformerParams {
    type Object = PowerTransformer<F>;

    fn fit_transformer(&self, X: ArrayView2<F>) -> Result<PowerTransformer<F>> {
        self.fit(X)
    }
}

/// Column-wise Yeo-Johnson power transform.
///
/// Each column gets its own exponent, chosen so that the transformed column
/// is as close to Gaussian as possible. Skewed predictors become more
/// symmetric, which often makes their relation to the targets closer to
/// linear.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerTransformer<F> {
    lambdas: Array1<F>,
    scaler: Option<StandardScaler<F>>,
}

impl<F: Float> PowerTransformer<F> {
    /// Fitted exponent of each column.
    pub fn lambdas(&self) -> ArrayView1<'_, F> {
        self.lambdas.view()
    }

    pub fn scaler(&self) -> Option<&StandardScaler<F>> {
        self.scaler.as_ref()
    }

    fn power_transform(&self, X: ArrayView2<F>) -> Result<Array2<F>> {
        check_columns(self.lambdas.len(), X.ncols())?;
        let mut out = X.to_owned();
        for (mut column, &lambda) in out.axis_iter_mut(Axis(1)).zip(self.lambdas.iter()) {
            column.mapv_inplace(|x| yeo_johnson(x, lambda));
        }
        Ok(out)
    }

    pub fn transform(&self, X: ArrayView2<F>) -> Result<Array2<F>> {
        let transformed = self.power_transform(X)?;
        match &self.scaler {
            Some(scaler) => scaler.transform(transformed.view()),
            None => Ok(transformed),
        }
    }

    pub fn inverse_transform(&self, X: ArrayView2<F>) -> Result<Array2<F>> {
        check_columns(self.lambdas.len(), X.ncols())?;
        let mut out = match &self.scaler {
            Some(scaler) => scaler.inverse_transform(X)?,
            None => X.to_owned(),
        };
        for (mut column, &lambda) in out.axis_iter_mut(Axis(1)).zip(self.lambdas.iter()) {
            column.mapv_inplace(|y| yeo_johnson_inverse(y, lambda));
        }
        Ok(out)
    }
}

impl<F: Float> Transformer<F> for PowerTransformer<F> {
    fn transform(&self, X: ArrayView2<F>) -> Result<Array2<F>> {
        PowerTransformer::transform(self, X)
    }
}
