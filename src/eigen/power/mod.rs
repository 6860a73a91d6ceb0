//! Power-iteration eigensolver with internal deflation.
//!
//! Iterative backend for the [`EigenSolve`](crate::eigen::EigenSolve) seam:
//! extracts one dominant eigenpair at a time, deflating the matrix between
//! components. Start vectors are drawn from a seeded generator so results
//! are reproducible.

use log::trace;
use ndarray::{Array1, Array2, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::eigen::{reduced, EigenPair, EigenSolve};
use crate::error::SpectralError;
use crate::norm::VectorNorm;
use crate::FloatOps;

pub struct PowerIteration {
    max_iterations: usize,
    tolerance: f64,
    seed: u64,
}

impl PowerIteration {
    pub fn new() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-12,
            seed: 42,
        }
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn dominant<T: FloatOps>(
        &self,
        matrix: &Array2<T>,
        norm: &dyn VectorNorm<T>,
        rng: &mut ChaCha8Rng,
    ) -> anyhow::Result<EigenPair<T>> {
        let dim = matrix.nrows();
        let tol = T::from(self.tolerance).unwrap();

        // Anything below this is indistinguishable from a zero matrix at
        // the working precision.
        let mut frobenius = T::zero();
        for &x in matrix.iter() {
            frobenius += x * x;
        }
        let floor = tol * (T::one() + frobenius.sqrt());

        let mut v: Array1<T> =
            Array1::from_iter((0..dim).map(|_| T::from(rng.random_range(-1.0..1.0)).unwrap()));
        let scale = norm.calculate(v.view());
        if scale <= T::zero() {
            v = Array1::ones(dim);
        } else {
            v = v / scale;
        }

        for iteration in 0..self.max_iterations {
            let w = matrix.dot(&v);
            let scale = norm.calculate(w.view());
            if scale < floor {
                return Err(SpectralError::NumericDegeneracy {
                    context: format!(
                        "matrix is numerically rank-deficient after {} power iterations",
                        iteration
                    ),
                }
                .into());
            }
            let next = w / scale;

            // The iterate may flip sign every step when the dominant
            // eigenvalue is negative; track drift up to sign.
            let mut d_plus = T::zero();
            let mut d_minus = T::zero();
            for (&a, &b) in next.iter().zip(v.iter()) {
                let dp = a - b;
                let dm = a + b;
                d_plus += dp * dp;
                d_minus += dm * dm;
            }
            let drift = d_plus.min(d_minus).sqrt();
            v = next;
            if drift < tol {
                trace!("power iteration converged after {} steps", iteration + 1);
                break;
            }
        }

        let av = matrix.dot(&v);
        let value = v.dot(&av) / v.dot(&v);

        // Deterministic sign: largest-magnitude component non-negative.
        let mut lead = 0;
        for (i, &x) in v.iter().enumerate() {
            if x.abs() > v[lead].abs() {
                lead = i;
            }
        }
        if v[lead] < T::zero() {
            v.mapv_inplace(|x| -x);
        }

        Ok(EigenPair::new(value, v))
    }
}

impl Default for PowerIteration {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatOps> EigenSolve<T> for PowerIteration {
    fn solve(
        &self,
        matrix: ArrayView2<T>,
        count: usize,
        norm: &dyn VectorNorm<T>,
    ) -> anyhow::Result<Vec<EigenPair<T>>> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SpectralError::DimensionMismatch {
                context: "PowerIteration::solve",
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

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut deflated = matrix.to_owned();
        let mut out = Vec::with_capacity(count);

        for _ in 0..count {
            let pair = self.dominant(&deflated, norm, &mut rng)?;
            deflated = reduced(deflated.view(), std::slice::from_ref(&pair))?;
            out.push(pair);
        }

        Ok(out)
    }
}
