//! Exact eigensolver backend on top of `nalgebra::SymmetricEigen`.
//!
//! Decomposes the full matrix in one shot, then orders, truncates, and
//! re-normalises to the [`EigenSolve`](crate::eigen::EigenSolve) contract.
//! Unlike the power-iteration backend it handles zero eigenvalues of
//! rank-deficient matrices, at the cost of always paying for the full
//! decomposition.

use nalgebra::{RealField, SymmetricEigen};
use ndarray::{Array1, ArrayView2};
use nshare::IntoNalgebra;

use crate::eigen::{EigenPair, EigenSolve};
use crate::error::SpectralError;
use crate::norm::VectorNorm;
use crate::FloatOps;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactEigen;

impl ExactEigen {
    pub fn new() -> Self {
        Self
    }
}

impl<T: FloatOps + RealField> EigenSolve<T> for ExactEigen {
    fn solve(
        &self,
        matrix: ArrayView2<T>,
        count: usize,
        norm: &dyn VectorNorm<T>,
    ) -> anyhow::Result<Vec<EigenPair<T>>> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SpectralError::DimensionMismatch {
                context: "ExactEigen::solve",
                expected: "a square matrix".into(),
                found: format!("{}x{}", rows, cols),
            }
            .into());
        }
        if count > rows {
            return Err(SpectralError::NumericDegeneracy {
                context: format!("{} eigenpairs requested from a {}x{} matrix", count, rows, cols),
            }
            .into());
        }

        let decomp = SymmetricEigen::new(matrix.to_owned().into_nalgebra());

        let mut order: Vec<usize> = (0..rows).collect();
        order.sort_by(|&a, &b| {
            let fa = num_traits::Float::abs(decomp.eigenvalues[a]);
            let fb = num_traits::Float::abs(decomp.eigenvalues[b]);
            fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut out = Vec::with_capacity(count);
        for &idx in order.iter().take(count) {
            let mut v: Array1<T> =
                Array1::from_iter(decomp.eigenvectors.column(idx).iter().cloned());

            let scale = norm.calculate(v.view());
            if scale <= T::zero() {
                return Err(SpectralError::NumericDegeneracy {
                    context: "eigenvector with zero magnitude".into(),
                }
                .into());
            }
            v = v / scale;

            let mut lead = 0;
            for (i, &x) in v.iter().enumerate() {
                if num_traits::Float::abs(x) > num_traits::Float::abs(v[lead]) {
                    lead = i;
                }
            }
            if v[lead] < T::zero() {
                v.mapv_inplace(|x| -x);
            }

            out.push(EigenPair::new(decomp.eigenvalues[idx], v));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eigen::PowerIteration;
    use crate::norm::Euclidean;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_known_spectrum() {
        let m = array![[2.0, 1.0], [1.0, 2.0]];
        let pairs: Vec<EigenPair<f64>> = ExactEigen::new().solve(m.view(), 2, &Euclidean).unwrap();

        assert_relative_eq!(pairs[0].value(), 3.0, epsilon = 1e-10);
        assert_relative_eq!(pairs[1].value(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_handles_rank_deficient_matrix() {
        let m = array![[1.0, 1.0], [1.0, 1.0]];
        let pairs: Vec<EigenPair<f64>> = ExactEigen::new().solve(m.view(), 2, &Euclidean).unwrap();

        assert_relative_eq!(pairs[0].value(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(pairs[1].value(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_agrees_with_power_iteration() {
        let m = array![[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let exact: Vec<EigenPair<f64>> = ExactEigen::new().solve(m.view(), 2, &Euclidean).unwrap();
        let power: Vec<EigenPair<f64>> =
            PowerIteration::new().solve(m.view(), 2, &Euclidean).unwrap();

        for (e, p) in exact.iter().zip(power.iter()) {
            assert_relative_eq!(e.value(), p.value(), epsilon = 1e-6);
            for (&a, &b) in e.vector().iter().zip(p.vector().iter()) {
                assert_relative_eq!(a, b, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_count_beyond_dimension_fails() {
        let m = array![[1.0, 0.0], [0.0, 1.0]];
        let err = <ExactEigen as EigenSolve<f64>>::solve(
            &ExactEigen::new(),
            m.view(),
            3,
            &Euclidean,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SpectralError>(),
            Some(SpectralError::NumericDegeneracy { .. })
        ));
    }
}
