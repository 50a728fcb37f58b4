use crate::datasets::{DatasetBase, DesignMatrix, Targets};

/// Fit trait
///
/// The fittable trait allows an estimator to be fitted to a dataset (a combination
/// of design matrix and targets). More formally, the model estimates coefficients
/// that minimizes an empirical risk (loss function).
pub trait Fit<DM: DesignMatrix, T: Targets, E: std::error::Error> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<DM, T>) -> Result<Self::Object, E>;
}

/// Predict trait
///
/// A fitted model maps every row of a design matrix to a predicted target.
pub trait Predict<DM: DesignMatrix, E: std::error::Error> {
    type Output;

    fn predict(&self, design_matrix: &DM) -> Result<Self::Output, E>;
}
