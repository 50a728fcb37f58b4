//! Dense linear algebra for the normal equation.
//!
//! The Gram matrix `XᵗX` of a full-rank design matrix is symmetric positive
//! definite, so the default route is a Cholesky factorization followed by a
//! forward and a backward substitution. Gaussian elimination with partial
//! pivoting and an explicit Gauss-Jordan inverse are kept as alternatives.
//!
//! The systems solved here are `(M+1) x (M+1)`; no LAPACK binding is used.
//!
//! Singularity is detected with a relative pivot threshold. [`solve`] first
//! equilibrates the system to a unit diagonal, `D^{-1/2} A D^{-1/2}` with
//! `D = diag(A)`, so that a column measured in large units does not make the
//! pivots of the other columns look negligible. A Cholesky pivot is then
//! rejected when it does not exceed `tolerance * A[j, j]`, an elimination
//! pivot when it does not exceed `tolerance * max|A|`.

use crate::Float;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use thiserror::Error;


/// Error variants raised by the factorizations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    #[error("singular matrix: pivot {pivot} at index {index}")]
    Singular { index: usize, pivot: f64 },
    #[error("expected a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("right-hand side has length {found}, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, LinalgError>;

/// Strategy used to solve `(XᵗX) w = Xᵗt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveMethod {
    /// `XᵗX = LLᵗ`, then two triangular solves.
    #[default]
    Cholesky,
    /// Gaussian elimination with partial pivoting.
    Lu,
    /// Forms `(XᵗX)⁻¹` and multiplies it with `Xᵗt`. Slower and less precise
    /// than the two other methods.
    ExplicitInverse,
}

/// Computes `XᵗX`.
pub fn gram<F: Float>(X: ArrayView2<F>) -> Array2<F> {
    X.t().dot(&X)
}

/// Computes `Xᵗy`.
pub fn xt_y<F: Float>(X: ArrayView2<F>, y: ArrayView1<F>) -> Array1<F> {
    X.t().dot(&y)
}

fn singular<F: Float>(index: usize, pivot: F) -> LinalgError {
    LinalgError::Singular {
        index,
        pivot: pivot.to_f64().unwrap_or(f64::NAN),
    }
}

fn check_square<F>(A: ArrayView2<F>) -> Result<usize> {
    let (rows, cols) = A.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(rows)
}

fn check_rhs<F>(size: usize, b: ArrayView1<F>) -> Result<()> {
    if b.len() != size {
        return Err(LinalgError::DimensionMismatch {
            expected: size,
            found: b.len(),
        });
    }
    Ok(())
}

fn max_abs<F: Float>(A: ArrayView2<F>) -> F {
    A.fold(F::zero(), |max_val, &a| max_val.max(a.abs()))
}

/// Cholesky factorization `A = LLᵗ` of a symmetric positive definite matrix.
///
/// Only the lower triangle of `A` is read. Returns the lower triangular
/// factor `L`, or an error at the first pivot that does not exceed
/// `tolerance * A[j, j]`.
pub fn cholesky_factorization<F: Float>(A: ArrayView2<F>, tolerance: F) -> Result<Array2<F>> {
    let size = check_square(A.view())?;
    let mut L = Array2::<F>::zeros((size, size));

    for j in 0..size {
        let row_j = L.slice(s![j, ..j]).to_owned();
        let pivot = A[[j, j]] - row_j.dot(&row_j);
        if !(pivot > tolerance * A[[j, j]].max(F::zero())) {
            return Err(singular(j, pivot));
        }
        let l_jj = pivot.sqrt();
        L[[j, j]] = l_jj;

        for i in (j + 1)..size {
            let dot = L.slice(s![i, ..j]).dot(&row_j);
            L[[i, j]] = (A[[i, j]] - dot) / l_jj;
        }
    }
    Ok(L)
}

/// Solves `Ly = b` for a lower triangular `L`.
pub fn forward_substitution<F: Float>(L: ArrayView2<F>, b: ArrayView1<F>) -> Result<Array1<F>> {
    let size = check_square(L.view())?;
    check_rhs(size, b.view())?;
    let mut y = Array1::<F>::zeros(size);
    for i in 0..size {
        if L[[i, i]] == F::zero() {
            return Err(singular(i, L[[i, i]]));
        }
        let dot = L.slice(s![i, ..i]).dot(&y.slice(s![..i]));
        y[i] = (b[i] - dot) / L[[i, i]];
    }
    Ok(y)
}

/// Solves `Ux = b` for an upper triangular `U`.
pub fn backward_substitution<F: Float>(U: ArrayView2<F>, b: ArrayView1<F>) -> Result<Array1<F>> {
    let size = check_square(U.view())?;
    check_rhs(size, b.view())?;
    let mut x = Array1::<F>::zeros(size);
    for i in (0..size).rev() {
        if U[[i, i]] == F::zero() {
            return Err(singular(i, U[[i, i]]));
        }
        let dot = U.slice(s![i, (i + 1)..]).dot(&x.slice(s![(i + 1)..]));
        x[i] = (b[i] - dot) / U[[i, i]];
    }
    Ok(x)
}

/// Solves `Ax = b` for a symmetric positive definite `A`.
pub fn solve_lin_sys_by_cholesky<F: Float>(
    A: ArrayView2<F>,
    b: ArrayView1<F>,
    tolerance: F,
) -> Result<Array1<F>> {
    let L = cholesky_factorization(A, tolerance)?;
    let y = forward_substitution(L.view(), b)?;
    backward_substitution(L.t(), y.view())
}

/// Solves `Ax = b` with Gaussian elimination and partial pivoting.
pub fn solve_lin_sys_by_lu<F: Float>(
    A: ArrayView2<F>,
    b: ArrayView1<F>,
    tolerance: F,
) -> Result<Array1<F>> {
    let size = check_square(A.view())?;
    check_rhs(size, b.view())?;
    let threshold = tolerance * max_abs(A.view());

    // Augmented system [A | b]
    let mut system = Array2::<F>::zeros((size, size + 1));
    system.slice_mut(s![.., ..size]).assign(&A);
    system.slice_mut(s![.., size]).assign(&b);

    // Echelon form
    for k in 0..size {
        let p = pivot_row(system.view(), k);
        let pivot = system[[p, k]];
        if !(pivot.abs() > threshold) {
            return Err(singular(k, pivot));
        }
        swap_rows(&mut system, k, p);
        for i in (k + 1)..size {
            let factor = system[[i, k]] / pivot;
            if factor == F::zero() {
                continue;
            }
            for j in k..(size + 1) {
                let delta = factor * system[[k, j]];
                system[[i, j]] -= delta;
            }
        }
    }

    backward_substitution(
        system.slice(s![.., ..size]),
        system.slice(s![.., size]),
    )
}

/// Inverts `A` with Gauss-Jordan elimination and partial pivoting.
pub fn invert<F: Float>(A: ArrayView2<F>, tolerance: F) -> Result<Array2<F>> {
    let size = check_square(A.view())?;
    let threshold = tolerance * max_abs(A.view());

    // Augmented system [A | I]
    let mut system = Array2::<F>::zeros((size, 2 * size));
    system.slice_mut(s![.., ..size]).assign(&A);
    for i in 0..size {
        system[[i, size + i]] = F::one();
    }

    for k in 0..size {
        let p = pivot_row(system.view(), k);
        let pivot = system[[p, k]];
        if !(pivot.abs() > threshold) {
            return Err(singular(k, pivot));
        }
        swap_rows(&mut system, k, p);
        system.row_mut(k).mapv_inplace(|v| v / pivot);

        let normalized = system.row(k).to_owned();
        for (i, mut row) in system.axis_iter_mut(Axis(0)).enumerate() {
            if i == k {
                continue;
            }
            let factor = row[k];
            if factor != F::zero() {
                row.scaled_add(-factor, &normalized);
            }
        }
    }

    Ok(system.slice(s![.., size..]).to_owned())
}

/// Symmetric diagonal scaling of `A` to a unit diagonal.
///
/// Returns `D^{-1/2} A D^{-1/2}` and the factors `D^{-1/2}`. Zero or
/// non-finite diagonal entries keep a unit factor.
pub fn equilibrate<F: Float>(A: ArrayView2<F>) -> (Array2<F>, Array1<F>) {
    let factors = A.diag().mapv(|d| {
        let d = d.abs();
        if d > F::zero() && d.is_finite() {
            F::one() / d.sqrt()
        } else {
            F::one()
        }
    });
    let rows = factors.view().insert_axis(Axis(1));
    let scaled = &A * &rows * &factors;
    (scaled, factors)
}

/// Solves `Ax = b` with the requested strategy.
///
/// The system is equilibrated before it is factorized, and the solution is
/// scaled back: with `S = D^{-1/2}`, `(SAS) y = Sb` and `x = Sy`.
pub fn solve<F: Float>(
    A: ArrayView2<F>,
    b: ArrayView1<F>,
    method: SolveMethod,
    tolerance: F,
) -> Result<Array1<F>> {
    let size = check_square(A.view())?;
    check_rhs(size, b.view())?;
    let (A_scaled, factors) = equilibrate(A);
    let b_scaled = &b * &factors;

    let y = match method {
        SolveMethod::Cholesky => {
            solve_lin_sys_by_cholesky(A_scaled.view(), b_scaled.view(), tolerance)?
        }
        SolveMethod::Lu => solve_lin_sys_by_lu(A_scaled.view(), b_scaled.view(), tolerance)?,
        SolveMethod::ExplicitInverse => invert(A_scaled.view(), tolerance)?.dot(&b_scaled),
    };
    let x = y * &factors;
    if let Some(index) = x.iter().position(|v| !v.is_finite()) {
        return Err(singular(index, x[index]));
    }
    Ok(x)
}

/// Index of the row at or below `k` with the largest entry in column `k`.
fn pivot_row<F: Float>(system: ArrayView2<F>, k: usize) -> usize {
    let mut best = k;
    for i in (k + 1)..system.nrows() {
        if system[[i, k]].abs() > system[[best, k]].abs() {
            best = i;
        }
    }
    best
}

fn swap_rows<F: Float>(system: &mut Array2<F>, a: usize, b: usize) {
    if a == b {
        return;
    }
    for j in 0..system.ncols() {
        system.swap([a, j], [b, j]);
    }
}
