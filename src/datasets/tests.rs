use ndarray::{array, Array1, Array2};

use super::*;
use crate::estimators::error::EstimatorError;

#[test]
fn dataset_from_tuple() {
    let X = array![[2., 3.], [2., 5.], [3., 4.], [5., 9.]];
    let y = array![1., 5., 6., 8.];
    let dataset = DatasetBase::from((X.view(), y.view()));
    assert_eq!(dataset.n_samples(), 4);
    assert_eq!(dataset.n_features(), 2);
    assert!(dataset.check().is_ok());
}

#[test]
fn dataset_with_bias() {
    let X = array![[2., 3.], [2., 5.]];
    let y = array![1., 5.];
    let dataset = DatasetBase::new(X, y);
    let biased = dataset.with_bias();
    assert_eq!(biased.design_matrix, array![[1., 2., 3.], [1., 2., 5.]]);
    assert_eq!(biased.targets, array![1., 5.]);
}

#[test]
fn check_rejects_mismatched_shapes() {
    let X = Array2::<f64>::zeros((3, 2));
    let y = Array1::<f64>::zeros(4);
    let dataset = DatasetBase::new(X, y);
    match dataset.check() {
        Err(EstimatorError::DimensionMismatch { expected, found }) => {
            assert_eq!(expected, 3);
            assert_eq!(found, 4);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn check_rejects_non_finite_entries() {
    let X = array![[1., f64::NAN], [2., 3.]];
    let y = array![1., 2.];
    let dataset = DatasetBase::new(X, y);
    assert_eq!(dataset.check(), Err(EstimatorError::NonFiniteInput));

    let X = array![[1., 2.], [2., 3.]];
    let y = array![1., f64::INFINITY];
    let dataset = DatasetBase::new(X, y);
    assert_eq!(dataset.check(), Err(EstimatorError::NonFiniteInput));
}
