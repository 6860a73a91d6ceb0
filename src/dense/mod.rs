//! Builders for the derived matrices the eigen engines decompose:
//! sample covariance for PCA and the double-centred Gramian for classical MDS,
//! plus the pairwise distance matrix the Gramian is built from.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::error::SpectralError;
use crate::norm::VectorNorm;
use crate::FloatOps;

/// Sample covariance (n−1 convention) of the columns of `x`.
///
/// Rows are observations, columns are features. The result is square,
/// symmetric and `ncols × ncols`.
pub fn covariance<T: FloatOps>(x: ArrayView2<T>) -> anyhow::Result<Array2<T>> {
    let (rows, cols) = x.dim();
    if rows < 2 || cols == 0 {
        return Err(SpectralError::DimensionMismatch {
            context: "covariance",
            expected: "at least 2 observations and 1 feature".into(),
            found: format!("{}x{}", rows, cols),
        }
        .into());
    }

    let mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| anyhow::anyhow!("failed to compute column means"))?;

    let mut centered = x.to_owned();
    for mut row in centered.rows_mut() {
        row -= &mean;
    }

    let denom = T::from(rows - 1).unwrap();
    Ok(centered.t().dot(&centered) / denom)
}

/// Pairwise distance matrix between the rows of `a` and the rows of `b`
/// under the supplied norm: `d[i][j] = norm(a_i − b_j)`.
///
/// Symmetric with a zero diagonal when `a` and `b` are the same matrix and
/// the norm is a metric.
pub fn pairwise_distance<T: FloatOps>(
    a: ArrayView2<T>,
    b: ArrayView2<T>,
    norm: &dyn VectorNorm<T>,
) -> anyhow::Result<Array2<T>> {
    if a.ncols() != b.ncols() {
        return Err(SpectralError::DimensionMismatch {
            context: "pairwise_distance",
            expected: format!("{} columns", a.ncols()),
            found: format!("{} columns", b.ncols()),
        }
        .into());
    }

    let mut out = Array2::zeros((a.nrows(), b.nrows()));
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let ai = a.row(i);
            for (j, slot) in row.iter_mut().enumerate() {
                let diff = &ai - &b.row(j);
                *slot = norm.calculate(diff.view());
            }
        });

    Ok(out)
}

/// Double-centred Gramian of a distance matrix: `B = −½·J·D²·J` with
/// `J = I − (1/n)·1·1ᵀ`, the matrix classical MDS decomposes.
///
/// Symmetric for symmetric input and positive semidefinite when `d` is a
/// true distance matrix.
pub fn gramian<T: FloatOps>(d: ArrayView2<T>) -> anyhow::Result<Array2<T>> {
    let (rows, cols) = d.dim();
    if rows != cols || rows == 0 {
        return Err(SpectralError::DimensionMismatch {
            context: "gramian",
            expected: "a non-empty square distance matrix".into(),
            found: format!("{}x{}", rows, cols),
        }
        .into());
    }

    let sq = d.mapv(|v| v * v);
    let n = T::from(rows).unwrap();
    let row_means: Array1<T> = sq.sum_axis(Axis(1)) / n;
    let col_means: Array1<T> = sq.sum_axis(Axis(0)) / n;
    let grand_mean = row_means.sum() / n;
    let half = T::from(0.5).unwrap();

    let mut out = sq;
    for ((i, j), v) in out.indexed_iter_mut() {
        *v = -half * (*v - row_means[i] - col_means[j] + grand_mean);
    }

    Ok(out)
}

/// Text form of a matrix: one line per row, values separated by tabs.
pub fn render<T: FloatOps>(m: ArrayView2<T>) -> String {
    let mut out = String::new();
    for row in m.rows() {
        let line = row
            .iter()
            .map(|v| format!("{}", v))
            .collect::<Vec<_>>()
            .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::norm::{Euclidean, Manhattan};
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_covariance_known_values() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let c = covariance(x.view()).unwrap();

        assert_relative_eq!(c[[0, 0]], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(c[[1, 1]], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(c[[0, 1]], -1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(c[[1, 0]], -1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_symmetry_random() {
        let mut rng = StdRng::seed_from_u64(42);
        let x = Array2::from_shape_fn((20, 6), |_| rng.random_range(-5.0..5.0));
        let c = covariance(x.view()).unwrap();

        assert_eq!(c.dim(), (6, 6));
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(c[[i, j]], c[[j, i]], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_covariance_rejects_single_row() {
        let x = array![[1.0, 2.0]];
        let err = covariance(x.view()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SpectralError>(),
            Some(SpectralError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_pairwise_distance_self() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let d = pairwise_distance(x.view(), x.view(), &Euclidean).unwrap();

        assert_eq!(d.dim(), (3, 3));
        for i in 0..3 {
            assert_relative_eq!(d[[i, i]], 0.0);
        }
        assert_relative_eq!(d[[0, 1]], 1.0);
        assert_relative_eq!(d[[0, 2]], 1.0);
        assert_relative_eq!(d[[1, 2]], 2.0f64.sqrt(), epsilon = 1e-12);
        // symmetric
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(d[[i, j]], d[[j, i]]);
            }
        }
    }

    #[test]
    fn test_pairwise_distance_manhattan() {
        let x = array![[0.0, 0.0], [1.0, 1.0]];
        let d = pairwise_distance(x.view(), x.view(), &Manhattan).unwrap();
        assert_relative_eq!(d[[0, 1]], 2.0);
    }

    #[test]
    fn test_pairwise_distance_rejects_column_mismatch() {
        let a = array![[1.0, 2.0]];
        let b = array![[1.0, 2.0, 3.0]];
        let err = pairwise_distance(a.view(), b.view(), &Euclidean).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SpectralError>(),
            Some(SpectralError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_gramian_known_values() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let d = pairwise_distance(x.view(), x.view(), &Euclidean).unwrap();
        let b = gramian(d.view()).unwrap();

        assert_relative_eq!(b[[0, 0]], 2.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(b[[1, 1]], 5.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(b[[0, 1]], -1.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(b[[1, 2]], -4.0 / 9.0, epsilon = 1e-12);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(b[[i, j]], b[[j, i]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_gramian_rejects_non_square() {
        let d = array![[0.0, 1.0, 2.0], [1.0, 0.0, 1.0]];
        let err = gramian(d.view()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SpectralError>(),
            Some(SpectralError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_render() {
        let m = array![[1.0, 2.0], [3.0, 4.0]];
        let text = render(m.view());
        assert_eq!(text, "1\t2\n3\t4\n");
    }
}
