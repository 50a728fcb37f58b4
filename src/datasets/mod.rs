extern crate ndarray;

use ndarray::{ArrayView1, ArrayView2};

#[cfg(test)]
mod tests;

mod impl_datasets;
mod impl_design_matrix;
mod impl_targets;

/// A dataset pairs a design matrix with the observed targets.
///
/// The design matrix holds one observation per row. Whether its first column
/// is the constant bias column is decided by the estimator hyperparameters,
/// not by the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<DM, T>
where
    DM: DesignMatrix,
{
    pub design_matrix: DM,
    pub targets: T,
}

/// Dense view over the observations of a dataset.
pub trait DesignMatrix: Sized {
    type Elem;

    fn n_samples(&self) -> usize;
    fn n_features(&self) -> usize;
    fn as_dense(&self) -> ArrayView2<'_, Self::Elem>;
}

/// Single-output regression targets.
pub trait Targets: Sized {
    type Elem;

    fn n_samples(&self) -> usize;
    fn as_single(&self) -> ArrayView1<'_, Self::Elem>;
}
