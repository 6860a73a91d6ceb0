//! Eigenpair extraction: the entity type, the solver seam, and the
//! deflation operator used for incremental extension.

use ndarray::{Array1, ArrayView2};

use crate::norm::VectorNorm;
use crate::FloatOps;

mod deflate;
pub mod exact;
pub mod power;

pub use deflate::reduced;
pub use exact::ExactEigen;
pub use power::PowerIteration;

/// One eigenvalue with its eigenvector. Immutable once produced by a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenPair<T> {
    value: T,
    vector: Array1<T>,
}

impl<T: FloatOps> EigenPair<T> {
    pub fn new(value: T, vector: Array1<T>) -> Self {
        Self { value, vector }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn vector(&self) -> &Array1<T> {
        &self.vector
    }
}

/// Solver seam for extracting dominant eigenpairs of a symmetric matrix.
///
/// Contract: returns exactly `count` pairs, ordered descending by eigenvalue
/// magnitude, each vector scaled to unit length under `norm` with its
/// largest-magnitude component non-negative. The engines treat implementors
/// as a correctness oracle but re-validate the ordering when extending a
/// partial decomposition.
pub trait EigenSolve<T: FloatOps>: Send + Sync {
    fn solve(
        &self,
        matrix: ArrayView2<T>,
        count: usize,
        norm: &dyn VectorNorm<T>,
    ) -> anyhow::Result<Vec<EigenPair<T>>>;
}
