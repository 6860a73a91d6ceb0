use ndarray::{Array2, ArrayView2};

use crate::eigen::EigenPair;
use crate::error::SpectralError;
use crate::FloatOps;

/// Spectral deflation: subtracts the contribution `λ·v·vᵀ / (vᵀ·v)` of every
/// known eigenpair from `matrix`, so that solving the result yields the next
/// eigenpairs of the original matrix in the same descending order.
///
/// The division by `vᵀ·v` keeps the subtraction exact when vectors are unit
/// length under a norm other than Euclidean. Caller contract (not checked
/// here): `known` is a prefix, in extraction order, of the true spectrum of
/// `matrix`.
pub fn reduced<T: FloatOps>(
    matrix: ArrayView2<T>,
    known: &[EigenPair<T>],
) -> anyhow::Result<Array2<T>> {
    let dim = matrix.nrows();
    let mut out = matrix.to_owned();

    for pair in known {
        let v = pair.vector();
        if v.len() != dim {
            return Err(SpectralError::DimensionMismatch {
                context: "reduced",
                expected: format!("eigenvector of length {}", dim),
                found: format!("length {}", v.len()),
            }
            .into());
        }

        let mut dot = T::zero();
        for &x in v.iter() {
            dot += x * x;
        }
        let scale = pair.value() / dot;

        for ((i, j), slot) in out.indexed_iter_mut() {
            *slot = *slot - scale * v[i] * v[j];
        }
    }

    Ok(out)
}
