use ndarray::{array, s, Array1, Array2};

use super::*;
use crate::datasets::DatasetBase;
use crate::helpers::helpers::add_bias_column;
use crate::helpers::test_helpers::{
    assert_array_all_close, fill_random_vector, generate_noiseless_data, generate_random_data,
};
use crate::linalg::SolveMethod;
use crate::preprocessing::{PowerTransformerParams, StandardScalerParams};

fn walkthrough_data() -> (Array2<f64>, Array1<f64>) {
    let X = array![[1., 2., 3.], [1., 2., 5.], [1., 3., 4.], [1., 5., 9.]];
    let t = array![1., 5., 6., 8.];
    (X, t)
}

#[test]
fn test_walkthrough_weights() {
    let (X, t) = walkthrough_data();
    let w = normal_equation(X.view(), t.view(), SolveMethod::Cholesky, 1e-12).unwrap();
    let ans = array![-1. / 7., 5. / 7., 4. / 7.];
    assert_array_all_close(w.view(), ans.view(), 1e-9);
}

#[test]
fn test_walkthrough_prediction_matches_fitted_value() {
    let (X, t) = walkthrough_data();
    let dataset = DatasetBase::from((X.view(), t.view()));
    let model = LinearRegression::params()
        .fit_intercept(false)
        .fit(&dataset)
        .unwrap();

    let fitted = X.dot(&model.weights());
    let y_q = model.predict_one(array![1., 2., 3.].view()).unwrap();
    assert!((y_q - fitted[0]).abs() < 1e-9);
    assert!((y_q - 3.).abs() < 1e-9);
}

#[test]
fn test_intercept_added_by_the_model() {
    let (X, t) = walkthrough_data();
    let raw = X.slice(s![.., 1..]).to_owned();
    let dataset = DatasetBase::new(raw.view(), t.view());
    let model = LinearRegression::params().fit(&dataset).unwrap();

    assert!(model.has_intercept());
    assert!((model.intercept() + 1. / 7.).abs() < 1e-9);
    assert_array_all_close(
        model.coefficients(),
        array![5. / 7., 4. / 7.].view(),
        1e-9,
    );

    // The query may carry the leading 1 or leave it to the model.
    let with_bias = model.predict_one(array![1., 2., 3.].view()).unwrap();
    let without_bias = model.predict_one(array![2., 3.].view()).unwrap();
    assert!((with_bias - without_bias).abs() < 1e-12);
}

#[test]
fn test_exact_recovery() {
    let (X, true_w, t) = generate_noiseless_data(50, 5);
    for method in [
        SolveMethod::Cholesky,
        SolveMethod::Lu,
        SolveMethod::ExplicitInverse,
    ] {
        let w = normal_equation(X.view(), t.view(), method, 1e-12).unwrap();
        assert_array_all_close(w.view(), true_w.view(), 1e-8);
    }
}

#[test]
fn test_residual_orthogonality() {
    let (X, t) = generate_random_data(40, 6);
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::params().fit(&dataset).unwrap();

    let r = model.residuals(&dataset).unwrap();
    let X_bias = add_bias_column(X.view());
    let Xtr = X_bias.t().dot(&r);
    assert_array_all_close(Xtr.view(), Array1::zeros(7).view(), 1e-9);
}

#[test]
fn test_intercept_only_returns_mean() {
    let t = array![3., 1., 4., 1., 5., 9.];
    let X = Array2::<f64>::zeros((6, 0));
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::params().fit(&dataset).unwrap();
    assert_eq!(model.weights().len(), 1);
    assert!((model.intercept() - 23. / 6.).abs() < 1e-12);

    let ones = Array2::<f64>::ones((6, 1));
    let w = normal_equation(ones.view(), t.view(), SolveMethod::Cholesky, 1e-12).unwrap();
    assert!((w[0] - 23. / 6.).abs() < 1e-12);
}

#[test]
fn test_idempotence() {
    let (X, t) = generate_random_data(30, 4);
    let dataset = DatasetBase::new(X.view(), t.view());
    let params = LinearRegression::params();
    let first = params.fit(&dataset).unwrap();
    let second = params.fit(&dataset).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_predict_dimension_mismatch() {
    let (X, t) = walkthrough_data();
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::params()
        .fit_intercept(false)
        .fit(&dataset)
        .unwrap();

    // Without intercept, the query must match the weights exactly.
    assert_eq!(
        model.predict_one(array![2., 3.].view()),
        Err(EstimatorError::DimensionMismatch {
            expected: 3,
            found: 2
        })
    );
    assert!(model.predict_one(array![1., 2., 3., 4.].view()).is_err());
    assert!(model.predict(&Array2::<f64>::zeros((2, 2))).is_err());
}

#[test]
fn test_batch_prediction() {
    let (X, t) = generate_random_data(25, 3);
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::params().fit(&dataset).unwrap();

    let y = model.predict(&X).unwrap();
    for (i, row) in X.rows().into_iter().enumerate() {
        let y_i = model.predict_one(row).unwrap();
        assert!((y[i] - y_i).abs() < 1e-12);
    }
    assert_eq!(
        model.predict(&add_bias_column(X.view())),
        Err(EstimatorError::DimensionMismatch {
            expected: 3,
            found: 4
        })
    );
}

#[test]
fn test_singular_system() {
    // The third column is twice the second one.
    let X = array![[1., 1., 2.], [1., 2., 4.], [1., 3., 6.], [1., 4., 8.]];
    let t = array![1., 2., 3., 4.];
    for method in [
        SolveMethod::Cholesky,
        SolveMethod::Lu,
        SolveMethod::ExplicitInverse,
    ] {
        assert!(matches!(
            normal_equation(X.view(), t.view(), method, 1e-12),
            Err(EstimatorError::SingularSystem { .. })
        ));
    }
}

#[test]
fn test_insufficient_data() {
    let X = array![[1., 2., 3.], [1., 2., 5.]];
    let t = array![1., 5.];
    assert_eq!(
        normal_equation(X.view(), t.view(), SolveMethod::Cholesky, 1e-12),
        Err(EstimatorError::InsufficientData {
            samples: 2,
            required: 3
        })
    );

    let dataset = DatasetBase::new(X.view(), t.view());
    assert!(matches!(
        LinearRegression::params().fit(&dataset),
        Err(EstimatorError::InsufficientData {
            samples: 2,
            required: 4
        })
    ));
}

#[test]
fn test_fit_rejects_mismatched_and_non_finite_data() {
    let X = array![[2., 3.], [2., 5.], [3., 4.]];
    let t = array![1., 5.];
    let dataset = DatasetBase::new(X.view(), t.view());
    assert!(matches!(
        LinearRegression::params().fit(&dataset),
        Err(EstimatorError::DimensionMismatch {
            expected: 3,
            found: 2
        })
    ));

    let X = array![[2., 3.], [2., f64::NAN], [3., 4.], [5., 9.]];
    let t = array![1., 5., 6., 8.];
    let dataset = DatasetBase::new(X.view(), t.view());
    assert_eq!(
        LinearRegression::params().fit(&dataset),
        Err(EstimatorError::NonFiniteInput)
    );
}

#[test]
fn test_centered_fit_matches_biased_fit() {
    let (X, t) = generate_random_data(30, 4);
    let dataset = DatasetBase::new(X.view(), t.view());
    let plain = LinearRegression::params().fit(&dataset).unwrap();
    let centered = LinearRegression::params()
        .center(true)
        .fit(&dataset)
        .unwrap();
    assert_array_all_close(plain.weights(), centered.weights(), 1e-9);

    let x_q = array![0.3, -1.2, 2.0, 0.5];
    let y_plain = plain.predict_one(x_q.view()).unwrap();
    let y_centered = centered.predict_one(x_q.view()).unwrap();
    assert!((y_plain - y_centered).abs() < 1e-9);
}

#[test]
fn test_centered_fit_insufficient_data() {
    let X = array![[1., 2.], [3., 5.]];
    let t = array![1., 2.];
    assert_eq!(
        normal_equation_centered(X.view(), t.view(), SolveMethod::Cholesky, 1e-12),
        Err(EstimatorError::InsufficientData {
            samples: 2,
            required: 3
        })
    );
}

#[test]
fn test_score() {
    let (X, t) = walkthrough_data();
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::params()
        .fit_intercept(false)
        .fit(&dataset)
        .unwrap();
    let r2 = model.score(&dataset).unwrap();
    assert!((r2 - 9. / 13.).abs() < 1e-9);
}

#[test]
fn test_params_validation() {
    let params = LinearRegression::<f64>::params().singular_tolerance(-1.);
    assert!(matches!(
        params.check(),
        Err(EstimatorError::InvalidTolerance(_))
    ));

    let params = LinearRegression::<f64>::params().singular_tolerance(f64::NAN);
    assert!(params.check_ref().is_err());

    let params = LinearRegression::<f64>::params()
        .fit_intercept(false)
        .center(true);
    assert_eq!(params.check(), Err(EstimatorError::InvalidCentering));

    let valid = LinearRegression::<f64>::params()
        .solve_method(SolveMethod::Lu)
        .check_unwrap();
    assert!(valid.fit_intercept());
    assert!(!valid.center());
    assert_eq!(valid.solve_method(), SolveMethod::Lu);
}

#[test]
fn test_invalid_params_fail_at_fit() {
    let (X, t) = walkthrough_data();
    let dataset = DatasetBase::new(X.view(), t.view());
    let res = LinearRegression::params()
        .fit_intercept(false)
        .center(true)
        .fit(&dataset);
    assert_eq!(res, Err(EstimatorError::InvalidCentering));
}

#[test]
fn test_checked_params_fit() {
    let (X, t) = walkthrough_data();
    let dataset = DatasetBase::new(X.view(), t.view());
    let params = LinearRegression::params()
        .fit_intercept(false)
        .solve_method(SolveMethod::ExplicitInverse)
        .check()
        .unwrap();
    let model = params.fit(&dataset).unwrap();
    assert_array_all_close(
        model.weights(),
        array![-1. / 7., 5. / 7., 4. / 7.].view(),
        1e-9,
    );
}

#[test]
fn test_f32_fit() {
    let X = array![[2f32, 3.], [2., 5.], [3., 4.], [5., 9.]];
    let t = array![1f32, 5., 6., 8.];
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::<f32>::params().fit(&dataset).unwrap();
    assert_array_all_close(
        model.weights(),
        array![-1f32 / 7., 5. / 7., 4. / 7.].view(),
        1e-3,
    );
}

#[test]
fn test_simple_regression_rent() {
    // Floor area in m² against monthly rent.
    let x = array![20f64, 40., 60.];
    let t = array![60000f64, 115000., 155000.];
    let model = SimpleLinearRegression::fit(x.view(), t.view()).unwrap();

    assert_eq!(model.x_mean(), 40.);
    assert_eq!(model.t_mean(), 110000.);
    assert!((model.slope() - 2375.).abs() < 1e-9);
    assert!((model.predict_one(50.) - 133750.).abs() < 1e-6);
    assert!((model.intercept() - 15000.).abs() < 1e-6);

    let y = model.predict(x.view());
    assert_array_all_close(y.view(), array![62500., 110000., 157500.].view(), 1e-6);
}

#[test]
fn test_simple_regression_agrees_with_normal_equation() {
    let x = array![0.5f64, 1.7, 2.2, 3.9, 4.1, 6.0];
    let t = array![1.1f64, 2.0, 2.9, 4.2, 4.0, 6.3];
    let simple = SimpleLinearRegression::fit(x.view(), t.view()).unwrap();

    let X = x.clone().insert_axis(ndarray::Axis(1));
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::params().fit(&dataset).unwrap();
    assert!((model.intercept() - simple.intercept()).abs() < 1e-9);
    assert!((model.coefficients()[0] - simple.slope()).abs() < 1e-9);
}

#[test]
fn test_simple_regression_errors() {
    let x = array![1f64];
    let t = array![2f64];
    assert!(matches!(
        SimpleLinearRegression::fit(x.view(), t.view()),
        Err(EstimatorError::InsufficientData { .. })
    ));

    let x = array![1f64, 2.];
    let t = array![2f64, 3., 4.];
    assert!(matches!(
        SimpleLinearRegression::fit(x.view(), t.view()),
        Err(EstimatorError::DimensionMismatch { .. })
    ));

    let x = array![0.1f64, 0.1, 0.1];
    let t = array![1f64, 2., 3.];
    assert!(matches!(
        SimpleLinearRegression::fit(x.view(), t.view()),
        Err(EstimatorError::SingularSystem { .. })
    ));
}

#[test]
fn test_large_magnitude_column_is_not_singular() {
    // t = 1 + 2e-7 x with x spanning 1e7 to 5e7.
    let X = array![[1e7f64], [2e7], [3e7], [4e7], [5e7]];
    let t = X.column(0).mapv(|x| 1. + 2e-7 * x);
    let dataset = DatasetBase::new(X.view(), t.view());

    for method in [
        SolveMethod::Cholesky,
        SolveMethod::Lu,
        SolveMethod::ExplicitInverse,
    ] {
        let model = LinearRegression::params()
            .solve_method(method)
            .fit(&dataset)
            .unwrap();
        assert!((model.intercept() - 1.).abs() < 1e-6);
        assert!((model.coefficients()[0] / 2e-7 - 1.).abs() < 1e-9);
    }
    let centered = LinearRegression::params()
        .center(true)
        .fit(&dataset)
        .unwrap();
    assert!((centered.intercept() - 1.).abs() < 1e-6);
}

#[test]
fn test_f32_fit_with_realistic_magnitudes() {
    let X = array![[200f32], [400.], [600.], [700.], [300.]];
    let t = X.column(0).mapv(|x| 3. + 0.5 * x);
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::<f32>::params().fit(&dataset).unwrap();
    assert!((model.intercept() - 3.).abs() < 1e-2);
    assert!((model.coefficients()[0] - 0.5).abs() < 1e-4);
}

#[test]
fn test_mixed_scale_columns_fit() {
    // One column around 1e7 next to one around 1.
    let X = array![
        [1.0e7f64, 0.5],
        [2.5e7, 1.5],
        [1.5e7, 2.5],
        [4.0e7, 0.0],
        [3.0e7, 3.0],
        [5.0e7, 1.0]
    ];
    let true_w = array![2f64, 3e-7, -1.5];
    let t = add_bias_column(X.view()).dot(&true_w);
    let dataset = DatasetBase::new(X.view(), t.view());
    let model = LinearRegression::params().fit(&dataset).unwrap();
    assert!((model.intercept() - 2.).abs() < 1e-6);
    assert!((model.coefficients()[0] / 3e-7 - 1.).abs() < 1e-8);
    assert!((model.coefficients()[1] + 1.5).abs() < 1e-8);
}

#[test]
fn test_insufficient_data_precedes_non_finite_input() {
    let X = array![[1., f64::NAN, 3.], [1., 2., 5.]];
    let t = array![1., 5.];
    let dataset = DatasetBase::new(X.view(), t.view());
    assert_eq!(
        LinearRegression::params().fit(&dataset),
        Err(EstimatorError::InsufficientData {
            samples: 2,
            required: 4
        })
    );
    assert_eq!(
        normal_equation(X.view(), t.view(), SolveMethod::Cholesky, 1e-12),
        Err(EstimatorError::InsufficientData {
            samples: 2,
            required: 3
        })
    );
}

#[test]
fn test_pipeline_with_scaler_matches_plain_fit() {
    let (X, t) = generate_random_data(40, 3);
    let dataset = DatasetBase::new(X.view(), t.view());
    let plain = LinearRegression::params().fit(&dataset).unwrap();
    let pipeline = PipelineParams::new(StandardScalerParams)
        .fit(&dataset)
        .unwrap();

    // Least squares predictions do not depend on an affine rescaling of the
    // predictors.
    let y_plain = plain.predict(&X).unwrap();
    let y_pipeline = pipeline.predict(&X).unwrap();
    assert_array_all_close(y_plain.view(), y_pipeline.view(), 1e-9);
    assert!((plain.score(&dataset).unwrap() - pipeline.score(&dataset).unwrap()).abs() < 1e-9);
    assert_eq!(pipeline.transformer().mean().len(), 3);
}

#[test]
fn test_pipeline_with_power_transform_improves_score() {
    // The targets are linear in ln(1 + x), not in x.
    let w = Array1::from(fill_random_vector(200, 21)).mapv(|z| 2. + 0.5 * z);
    let X = w.mapv(f64::exp_m1).insert_axis(ndarray::Axis(1));
    let t = w.mapv(|wi| 1. + 3. * wi);
    let dataset = DatasetBase::new(X.view(), t.view());

    let plain = LinearRegression::params().fit(&dataset).unwrap();
    let pipeline = PipelineParams::new(PowerTransformerParams::new())
        .fit(&dataset)
        .unwrap();

    let plain_score = plain.score(&dataset).unwrap();
    let pipeline_score = pipeline.score(&dataset).unwrap();
    assert!(pipeline_score > 0.99);
    assert!(pipeline_score > plain_score);
}

#[test]
fn test_pipeline_uses_regressor_params() {
    let (X, t) = generate_random_data(20, 2);
    let dataset = DatasetBase::new(X.view(), t.view());
    let pipeline = PipelineParams::new(StandardScalerParams)
        .regressor(LinearRegression::params().solve_method(SolveMethod::Lu))
        .fit(&dataset)
        .unwrap();
    assert!(pipeline.regressor().has_intercept());

    let invalid = PipelineParams::new(StandardScalerParams)
        .regressor(LinearRegression::params().fit_intercept(false).center(true))
        .fit(&dataset);
    assert_eq!(invalid, Err(EstimatorError::InvalidCentering));
}

#[test]
fn test_pipeline_rejects_bad_data() {
    let X = array![[1f64, 2.], [3., 4.]];
    let t = array![1f64, 2.];
    let dataset = DatasetBase::new(X.view(), t.view());
    assert_eq!(
        PipelineParams::new(StandardScalerParams).fit(&dataset),
        Err(EstimatorError::InsufficientData {
            samples: 2,
            required: 3
        })
    );

    let (X, t) = generate_random_data(10, 2);
    let dataset = DatasetBase::new(X.view(), t.view());
    let pipeline = PipelineParams::new(StandardScalerParams)
        .fit(&dataset)
        .unwrap();
    assert!(matches!(
        pipeline.predict(&Array2::<f64>::zeros((3, 4))),
        Err(EstimatorError::DimensionMismatch { .. })
    ));
}
