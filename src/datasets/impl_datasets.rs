use super::{DatasetBase, DesignMatrix, Targets};
use crate::estimators::error::{EstimatorError, Result};
use crate::helpers::helpers::{add_bias_column, all_finite};
use crate::Float;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix2};

/// This implementation block provides a method for the creation of datasets
/// from dense matrices.
impl<F: Float, D: Data<Elem = F>, T: Targets> From<(ArrayBase<D, Ix2>, T)>
    for DatasetBase<ArrayBase<D, Ix2>, T>
{
    fn from(data: (ArrayBase<D, Ix2>, T)) -> Self {
        DatasetBase {
            design_matrix: data.0,
            targets: data.1,
        }
    }
}

/// This implementation block provides methods to get record and target objects
/// from the dataset.
impl<DM: DesignMatrix, T: Targets> DatasetBase<DM, T> {
    /// This method instantiates a new dataset from a design matrix and targets.
    pub fn new(design_matrix: DM, targets: T) -> DatasetBase<DM, T> {
        DatasetBase {
            design_matrix,
            targets,
        }
    }

    /// This method is a getter for the targets.
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// This method is a getter for the design matrix.
    pub fn design_matrix(&self) -> &DM {
        &self.design_matrix
    }

    pub fn n_samples(&self) -> usize {
        self.design_matrix.n_samples()
    }

    pub fn n_features(&self) -> usize {
        self.design_matrix.n_features()
    }
}

impl<F: Float, DM: DesignMatrix<Elem = F>, T: Targets<Elem = F>> DatasetBase<DM, T> {
    /// Dense views over the design matrix and the targets.
    pub fn views(&self) -> (ArrayView2<'_, F>, ArrayView1<'_, F>) {
        (self.design_matrix.as_dense(), self.targets.as_single())
    }

    /// Checks that there is exactly one target per observation and that every
    /// entry of the dataset is finite.
    ///
    /// Shapes are checked first: a dataset with mismatched shapes reports
    /// [`EstimatorError::DimensionMismatch`] even if it also holds NaNs.
    pub fn check(&self) -> Result<()> {
        self.check_shapes()?;
        let (X, y) = self.views();
        if !all_finite(X.iter()) || !all_finite(y.iter()) {
            return Err(EstimatorError::NonFiniteInput);
        }
        Ok(())
    }

    /// Checks that there is one target per row of the design matrix.
    pub fn check_shapes(&self) -> Result<()> {
        let n_samples = self.design_matrix.n_samples();
        let n_targets = self.targets.n_samples();
        if n_samples != n_targets {
            return Err(EstimatorError::DimensionMismatch {
                expected: n_samples,
                found: n_targets,
            });
        }
        Ok(())
    }

    /// Returns an owned copy of the dataset whose design matrix starts with
    /// the constant bias column.
    pub fn with_bias(&self) -> DatasetBase<Array2<F>, Array1<F>> {
        let (X, y) = self.views();
        DatasetBase::new(add_bias_column(X), y.to_owned())
    }
}
