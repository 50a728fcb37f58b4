extern crate lstsq;

use log::info;
use ndarray::array;

use lstsq::{
    datasets::DatasetBase,
    estimators::{
        normal_equation, Fit, LinearRegression, PipelineParams, Predict, SimpleLinearRegression,
    },
    helpers::{split::train_test_split, test_helpers::generate_random_data},
    linalg::SolveMethod,
    preprocessing::{PowerTransformerParams, StandardScaler},
};

fn main() {
    env_logger::init();

    // Design matrix with the bias column already prepended
    let x = array![[1., 2., 3.], [1., 2., 5.], [1., 3., 4.], [1., 5., 9.]];
    let t = array![1., 5., 6., 8.];

    // Raw normal equation, with the three solve strategies
    for method in [
        SolveMethod::Cholesky,
        SolveMethod::Lu,
        SolveMethod::ExplicitInverse,
    ] {
        let w = normal_equation(x.view(), t.view(), method, 1e-12).unwrap();
        println!("{:?}: w = {}", method, w);
    }

    // Estimator API
    let dataset = DatasetBase::from((x.view(), t.view()));
    let model = LinearRegression::params()
        .fit_intercept(false)
        .fit(&dataset)
        .unwrap();
    let y_q = model.predict_one(array![1., 2., 3.].view()).unwrap();
    println!("prediction at [1, 2, 3]: {}", y_q);
    println!("R² on training data: {}", model.score(&dataset).unwrap());

    // Single-variable regression on centered data
    let area = array![20f64, 40., 60.];
    let rent = array![60000f64, 115000., 155000.];
    let simple = SimpleLinearRegression::fit(area.view(), rent.view()).unwrap();
    println!(
        "rent slope: {}, predicted rent at 50 m²: {}",
        simple.slope(),
        simple.predict_one(50.)
    );

    // Holdout evaluation with standardized features
    let (x, y) = generate_random_data(200, 8);
    let (x_train, x_test, t_train, t_test) =
        train_test_split(x.view(), y.view(), 0.3, 0).unwrap();
    let scaler = StandardScaler::fit(x_train.view()).unwrap();
    let x_train = scaler.transform(x_train.view()).unwrap();
    let x_test = scaler.transform(x_test.view()).unwrap();

    let train = DatasetBase::from((x_train, t_train));
    let test = DatasetBase::from((x_test.view(), t_test.view()));
    let model = LinearRegression::params().fit(&train).unwrap();
    info!("fitted {} weights", model.weights().len());

    let y_test = model.predict(&x_test).unwrap();
    println!("first test predictions: {}", y_test.slice(ndarray::s![..3]));
    println!("R² train: {}", model.score(&train).unwrap());
    println!("R² test: {}", model.score(&test).unwrap());

    // Power transform and regression chained in a pipeline
    let pipeline = PipelineParams::new(PowerTransformerParams::new())
        .fit(&train)
        .unwrap();
    println!(
        "power transform exponents: {}",
        pipeline.transformer().lambdas()
    );
    println!("pipeline R² test: {}", pipeline.score(&test).unwrap());
}
