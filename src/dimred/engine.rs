//! Incremental eigendecomposition state shared by the PCA and MDS engines:
//! a cached derived matrix plus an append-only sequence of eigenpairs that
//! grows by deflating against what is already known.

use std::sync::Arc;

use log::debug;
use ndarray::{Array1, Array2};

use crate::eigen::{reduced, EigenPair, EigenSolve};
use crate::error::SpectralError;
use crate::norm::VectorNorm;
use crate::FloatOps;

pub(crate) struct EigenEngine<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    solver: Arc<S>,
    norm: Arc<dyn VectorNorm<T>>,
    derived: Option<Array2<T>>,
    eigens: Vec<EigenPair<T>>,
}

impl<T, S> EigenEngine<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    pub(crate) fn new(solver: Arc<S>, norm: Arc<dyn VectorNorm<T>>) -> Self {
        Self {
            solver,
            norm,
            derived: None,
            eigens: Vec::new(),
        }
    }

    /// Drops the derived matrix and every extracted eigenpair. Called when
    /// the raw input is replaced.
    pub(crate) fn reset(&mut self) {
        self.derived = None;
        self.eigens.clear();
    }

    pub(crate) fn has_derived(&self) -> bool {
        self.derived.is_some()
    }

    pub(crate) fn set_derived(&mut self, matrix: Array2<T>) {
        self.derived = Some(matrix);
    }

    pub(crate) fn derived_ref(&self) -> anyhow::Result<&Array2<T>> {
        self.derived
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("derived matrix has not been computed"))
    }

    pub(crate) fn norm_ref(&self) -> &Arc<dyn VectorNorm<T>> {
        &self.norm
    }

    /// Resolves the caller-facing count convention: `0` means every
    /// component the derived matrix supports.
    pub(crate) fn resolve_count(&self, count: usize) -> anyhow::Result<usize> {
        let dim = self.derived_ref()?.nrows();
        let target = if count == 0 { dim } else { count };
        if target > dim {
            return Err(SpectralError::NumericDegeneracy {
                context: format!(
                    "{} components requested from a {}x{} derived matrix",
                    target, dim, dim
                ),
            }
            .into());
        }
        Ok(target)
    }

    /// Grows the eigen sequence to at least the resolved count and returns
    /// the whole sequence, which may hold more entries than requested.
    /// Already-extracted pairs are never recomputed: the shortfall is solved
    /// on the deflated matrix and appended.
    pub(crate) fn ensure_eigens(&mut self, count: usize) -> anyhow::Result<&[EigenPair<T>]> {
        let target = self.resolve_count(count)?;
        if self.eigens.len() >= target {
            return Ok(&self.eigens);
        }

        let fresh = {
            let derived = self.derived_ref()?;
            if self.eigens.is_empty() {
                debug!("solving derived matrix for {} eigenpairs", target);
                self.solver.solve(derived.view(), target, &*self.norm)?
            } else {
                let known = self.eigens.len();
                debug!(
                    "extending eigen sequence from {} to {} components via deflation",
                    known, target
                );
                let deflated = reduced(derived.view(), &self.eigens)?;
                self.solver
                    .solve(deflated.view(), target - known, &*self.norm)?
            }
        };
        self.append_validated(fresh)?;

        Ok(&self.eigens)
    }

    /// The solver contract says descending magnitude; a violation would
    /// silently corrupt every later deflation, so it is checked here.
    fn append_validated(&mut self, fresh: Vec<EigenPair<T>>) -> anyhow::Result<()> {
        let slack = T::from(1e-6).unwrap();
        for pair in fresh {
            if let Some(last) = self.eigens.last() {
                let bound = last.value().abs() * (T::one() + slack) + slack;
                if pair.value().abs() > bound {
                    return Err(SpectralError::NumericDegeneracy {
                        context: format!(
                            "eigensolver returned eigenvalue {} after {}, breaking the descending magnitude order",
                            pair.value(),
                            last.value()
                        ),
                    }
                    .into());
                }
            }
            self.eigens.push(pair);
        }
        Ok(())
    }

    /// Eigenvalues of the first resolved-count components, optionally
    /// normalised to sum to one (fraction of variance explained).
    pub(crate) fn spectrum(&mut self, count: usize, normalise: bool) -> anyhow::Result<Array1<T>> {
        let target = self.resolve_count(count)?;
        self.ensure_eigens(count)?;

        let mut spec = Array1::zeros(target);
        let mut sum = T::zero();
        for i in 0..target {
            spec[i] = self.eigens[i].value();
            sum += spec[i];
        }

        if normalise {
            if sum == T::zero() || !sum.is_finite() {
                return Err(SpectralError::NumericDegeneracy {
                    context: "eigen spectrum sums to zero, cannot normalise".into(),
                }
                .into());
            }
            spec.mapv_inplace(|v| v / sum);
        }

        Ok(spec)
    }

    /// Matrix whose rows are the extracted eigenvectors, in extraction
    /// order. Holds every cached component, at least the requested count.
    pub(crate) fn loadings(&mut self, count: usize) -> anyhow::Result<Array2<T>> {
        self.ensure_eigens(count)?;
        let dim = self.derived_ref()?.nrows();

        let mut out = Array2::zeros((self.eigens.len(), dim));
        for (i, pair) in self.eigens.iter().enumerate() {
            out.row_mut(i).assign(pair.vector());
        }
        Ok(out)
    }

    /// Single eigenvector by zero-based index, extending the sequence when
    /// the index is past its current length.
    pub(crate) fn loading(&mut self, index: usize) -> anyhow::Result<Array1<T>> {
        let dim = self.derived_ref()?.nrows();
        if index >= dim {
            return Err(SpectralError::IndexOutOfRange { index, len: dim }.into());
        }
        if self.eigens.len() <= index {
            self.ensure_eigens(index + 1)?;
        }
        Ok(self.eigens[index].vector().clone())
    }
}
