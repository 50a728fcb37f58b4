
/// This module contains small array utilities shared by the estimators.
pub mod helpers {
    use crate::Float;
    use ndarray::{s, Array2, ArrayView2};

    /// Prepends the constant bias column to a design matrix, so that the
    /// intercept becomes the first weight of the model.
    pub fn add_bias_column<F: Float>(X: ArrayView2<F>) -> Array2<F> {
        let (n_samples, n_features) = X.dim();
        let mut X_bias = Array2::<F>::ones((n_samples, n_features + 1));
        X_bias.slice_mut(s![.., 1..]).assign(&X);
        X_bias
    }

    pub fn all_finite<'a, F: Float>(mut values: impl Iterator<Item = &'a F>) -> bool {
        values.all(|v| v.is_finite())
    }
}

/// This module contains goodness-of-fit measures for regression models.
pub mod metrics {
    use crate::estimators::error::{EstimatorError, Result};
    use crate::Float;
    use ndarray::ArrayView1;

    fn check_pair<F>(t: ArrayView1<F>, y: ArrayView1<F>) -> Result<()> {
        if t.len() != y.len() {
            return Err(EstimatorError::DimensionMismatch {
                expected: t.len(),
                found: y.len(),
            });
        }
        if t.is_empty() {
            return Err(EstimatorError::InsufficientData {
                samples: 0,
                required: 1,
            });
        }
        Ok(())
    }

    fn residual_sum_of_squares<F: Float>(t: ArrayView1<F>, y: ArrayView1<F>) -> F {
        t.iter()
            .zip(y.iter())
            .map(|(&ti, &yi)| (ti - yi).powi(2))
            .sum()
    }

    /// Coefficient of determination `1 - SS_res / SS_tot`.
    ///
    /// Constant targets have no variance to explain: the score is then 1 for
    /// exact predictions and 0 otherwise.
    pub fn r2_score<F: Float>(t: ArrayView1<F>, y: ArrayView1<F>) -> Result<F> {
        check_pair(t.view(), y.view())?;
        let t_mean = t.sum() / F::cast(t.len());
        let ss_res = residual_sum_of_squares(t.view(), y.view());
        let ss_tot: F = t.iter().map(|&ti| (ti - t_mean).powi(2)).sum();
        if ss_tot == F::zero() {
            return Ok(if ss_res == F::zero() {
                F::one()
            } else {
                F::zero()
            });
        }
        Ok(F::one() - ss_res / ss_tot)
    }

    pub fn mean_squared_error<F: Float>(t: ArrayView1<F>, y: ArrayView1<F>) -> Result<F> {
        check_pair(t.view(), y.view())?;
        Ok(residual_sum_of_squares(t, y) / F::cast(t.len()))
    }
}

/// This module contains the holdout split of a dataset into a training and a
/// test part.
pub mod split {
    use crate::estimators::error::{EstimatorError, Result};
    use crate::Float;
    use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    /// Training design matrix, test design matrix, training targets, test
    /// targets.
    pub type Split<F> = (Array2<F>, Array2<F>, Array1<F>, Array1<F>);

    /// Randomly assigns `ceil(test_size * n_samples)` observations to the test
    /// set and the rest to the training set. The same `seed` always yields
    /// the same split.
    pub fn train_test_split<F: Float>(
        X: ArrayView2<F>,
        t: ArrayView1<F>,
        test_size: f64,
        seed: u64,
    ) -> Result<Split<F>> {
        let n_samples = X.nrows();
        if n_samples != t.len() {
            return Err(EstimatorError::DimensionMismatch {
                expected: n_samples,
                found: t.len(),
            });
        }
        if !(test_size > 0. && test_size < 1.) {
            return Err(EstimatorError::InvalidTestSize(test_size as f32));
        }
        if n_samples < 2 {
            return Err(EstimatorError::InsufficientData {
                samples: n_samples,
                required: 2,
            });
        }
        let n_test = (test_size * n_samples as f64).ceil() as usize;
        if n_test >= n_samples {
            return Err(EstimatorError::InvalidTestSize(test_size as f32));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
        let (test_idx, train_idx) = indices.split_at(n_test);

        Ok((
            X.select(Axis(0), train_idx),
            X.select(Axis(0), test_idx),
            t.select(Axis(0), train_idx),
            t.select(Axis(0), test_idx),
        ))
    }
}

/// This module contains helpers functions to efficiently write tests.
pub mod test_helpers {
    use crate::Float;
    use approx::AbsDiffEq;
    use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ShapeBuilder};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    pub fn assert_array_all_close<F>(x: ArrayView1<F>, y: ArrayView1<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.len(), y.len());
        for i in 0..x.len() {
            if x[i].abs_diff_ne(&y[i], delta) {
                panic!("x: {}, y: {} ; with precision level {}", x[i], y[i], delta);
            }
        }
    }

    pub fn assert_array2d_all_close<F>(x: ArrayView2<F>, y: ArrayView2<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.shape()[0], y.shape()[0]);
        assert_eq!(x.shape()[1], y.shape()[1]);
        for i in 0..x.shape()[0] {
            for j in 0..x.shape()[1] {
                if x[[i, j]].abs_diff_ne(&y[[i, j]], delta) {
                    panic!(
                        "x: {}, y: {} ; with precision level {}",
                        x[[i, j]],
                        y[[i, j]],
                        delta
                    );
                }
            }
        }
    }

    pub fn fill_random_vector(capacity: usize, seed: u64) -> Vec<f64> {
        let mut r = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0., 1.).unwrap();

        let mut data_x: Vec<f64> = Vec::with_capacity(capacity);
        for _ in 0..data_x.capacity() {
            data_x.push(normal.sample(&mut r));
        }
        data_x
    }

    /// Gaussian design matrix with a leading bias column, true weights and
    /// noiseless targets `t = Xw`.
    pub fn generate_noiseless_data(
        n_samples: usize,
        n_features: usize,
    ) -> (Array2<f64>, Array1<f64>, Array1<f64>) {
        let data_x = fill_random_vector(n_samples * n_features, 42);
        let data_w = fill_random_vector(n_features + 1, 43);
        let X = Array2::from_shape_vec((n_samples, n_features).f(), data_x).unwrap();
        let X = super::helpers::add_bias_column(X.view());
        let true_w = Array1::from_shape_vec(n_features + 1, data_w).unwrap();
        let t = X.dot(&true_w);

        (X, true_w, t)
    }

    /// Gaussian design matrix without bias column and noisy targets.
    pub fn generate_random_data(n_samples: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
        let data_x = fill_random_vector(n_samples * n_features, 42);
        let data_w = fill_random_vector(n_features, 43);
        let data_e = fill_random_vector(n_samples, 44);
        let X = Array2::from_shape_vec((n_samples, n_features).f(), data_x).unwrap();
        let true_w = Array1::from_shape_vec(n_features, data_w).unwrap();
        let noise = Array1::from_shape_vec(n_samples, data_e).unwrap();
        let y = X.dot(&true_w) + noise;

        (X, y)
    }
}
