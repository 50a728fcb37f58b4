use log::{debug, warn};
use ndarray::{s, Array1, ArrayView1, ArrayView2};

use super::error::{EstimatorError, Result};
use crate::helpers::helpers::all_finite;
use crate::linalg::{gram, solve, xt_y, SolveMethod};
use crate::preprocessing::Centering;
use crate::Float;

/// Solves the normal equation `(XᵗX) w = Xᵗt` for the weight vector `w`.
///
/// The design matrix is used as-is: when the model needs an intercept, the
/// caller supplies the constant bias column. The returned vector has one entry
/// per column of `X` and minimizes `(t - Xw)ᵗ(t - Xw)`.
///
/// Fails without touching the solver when the shapes disagree, when there are
/// fewer observations than unknowns or when an entry is not finite. A singular
/// or near-singular `XᵗX` (collinear predictors) is reported as
/// [`EstimatorError::SingularSystem`] instead of a degenerate solution.
pub fn normal_equation<F: Float>(
    X: ArrayView2<F>,
    t: ArrayView1<F>,
    method: SolveMethod,
    tolerance: F,
) -> Result<Array1<F>> {
    let (n_samples, n_columns) = X.dim();
    if n_samples != t.len() {
        return Err(EstimatorError::DimensionMismatch {
            expected: n_samples,
            found: t.len(),
        });
    }
    if n_samples == 0 || n_samples < n_columns {
        return Err(EstimatorError::InsufficientData {
            samples: n_samples,
            required: n_columns.max(1),
        });
    }
    if !all_finite(X.iter()) || !all_finite(t.iter()) {
        return Err(EstimatorError::NonFiniteInput);
    }

    debug!(
        "normal equation: {} samples, {} unknowns, {:?}",
        n_samples, n_columns, method
    );

    let XtX = gram(X);
    let Xtt = xt_y(X, t);
    solve(XtX.view(), Xtt.view(), method, tolerance).map_err(|err| {
        warn!("rejecting normal equation: {}", err);
        EstimatorError::from(err)
    })
}

/// Fits the slopes on centered data and recovers the intercept from the
/// means.
///
/// `X` holds the raw predictors without the bias column. The result has the
/// same layout as a fit on the biased design matrix: `w[0]` is the intercept,
/// `w[1..]` the per-feature coefficients.
pub fn normal_equation_centered<F: Float>(
    X: ArrayView2<F>,
    t: ArrayView1<F>,
    method: SolveMethod,
    tolerance: F,
) -> Result<Array1<F>> {
    let (n_samples, n_features) = X.dim();
    if n_samples != t.len() {
        return Err(EstimatorError::DimensionMismatch {
            expected: n_samples,
            found: t.len(),
        });
    }
    if n_samples < n_features + 1 {
        return Err(EstimatorError::InsufficientData {
            samples: n_samples,
            required: n_features + 1,
        });
    }

    let centering = Centering::fit(X, t)?;
    let Xc = centering.center_features(X)?;
    let tc = centering.center_targets(t);
    let slopes = normal_equation(Xc.view(), tc.view(), method, tolerance)?;
    let intercept = centering.intercept_for(slopes.view())?;

    let mut w = Array1::<F>::zeros(n_features + 1);
    w[0] = intercept;
    w.slice_mut(s![1..]).assign(&slopes);
    Ok(w)
}
