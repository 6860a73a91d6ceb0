//! # Principal Component Analysis
//!
//! PCA over the sample covariance of the data columns. Eigenpairs of the
//! covariance matrix are extracted incrementally: asking for more components
//! later extends the cached decomposition by deflation instead of starting
//! over.

use std::sync::Arc;

use log::debug;
use ndarray::{s, Array1, Array2};

use crate::dense::covariance;
use crate::dimred::engine::EigenEngine;
use crate::eigen::{EigenPair, EigenSolve};
use crate::norm::{Euclidean, VectorNorm};
use crate::FloatOps;

/// Builder for configuring and creating [`Pca`] instances.
pub struct PcaBuilder<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    solver: Arc<S>,
    norm: Arc<dyn VectorNorm<T>>,
    data: Option<Array2<T>>,
}

impl<T, S> PcaBuilder<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    pub fn new(solver: S) -> Self {
        Self {
            solver: Arc::new(solver),
            norm: Arc::new(Euclidean),
            data: None,
        }
    }

    /// Sets the vector norm used for distances and eigenvector scaling.
    /// Defaults to [`Euclidean`].
    pub fn norm<N: VectorNorm<T> + 'static>(mut self, norm: N) -> Self {
        self.norm = Arc::new(norm);
        self
    }

    /// Sets the initial data matrix (rows = observations, columns =
    /// features), equivalent to calling [`Pca::set_matrix`] after `build`.
    pub fn matrix(mut self, data: Array2<T>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn build(self) -> Pca<T, S> {
        Pca {
            data: self.data,
            engine: EigenEngine::new(self.solver, self.norm),
        }
    }
}

/// Principal Component Analysis engine.
///
/// Owns the raw data matrix, a lazily-computed covariance matrix, and the
/// incrementally-growing eigenpair sequence. All accessors take `&mut self`
/// because any of them may extend the cache; an instance is a single
/// computation pipeline and is not meant to be shared between threads.
pub struct Pca<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    data: Option<Array2<T>>,
    engine: EigenEngine<T, S>,
}

impl<T, S> Pca<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    /// Replaces the data matrix, discarding the cached covariance matrix and
    /// every extracted eigenpair.
    pub fn set_matrix(&mut self, data: Array2<T>) {
        self.engine.reset();
        self.data = Some(data);
    }

    pub fn data_matrix(&self) -> Option<&Array2<T>> {
        self.data.as_ref()
    }

    fn ensure_derived(&mut self) -> anyhow::Result<()> {
        if self.engine.has_derived() {
            return Ok(());
        }
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no data matrix has been set"))?;
        let cov = covariance(data.view())?;
        debug!("computed {}x{} covariance matrix", cov.nrows(), cov.ncols());
        self.engine.set_derived(cov);
        Ok(())
    }

    /// The covariance matrix, computed and cached on first call.
    pub fn cov_matrix(&mut self) -> anyhow::Result<&Array2<T>> {
        self.ensure_derived()?;
        self.engine.derived_ref()
    }

    /// At least `count` eigenpairs of the covariance matrix in descending
    /// magnitude order (`0` = every supported component). Returns the whole
    /// cached sequence, which may be longer than requested.
    pub fn eigen(&mut self, count: usize) -> anyhow::Result<&[EigenPair<T>]> {
        self.ensure_derived()?;
        self.engine.ensure_eigens(count)
    }

    /// The first `count` eigenvalues (`0` = all), optionally normalised to
    /// sum to one.
    pub fn eigen_spectrum(&mut self, count: usize, normalise: bool) -> anyhow::Result<Array1<T>> {
        self.ensure_derived()?;
        self.engine.spectrum(count, normalise)
    }

    /// Matrix whose rows are eigenvectors in extraction order; holds every
    /// cached component, at least `count`.
    pub fn loadings(&mut self, count: usize) -> anyhow::Result<Array2<T>> {
        self.ensure_derived()?;
        self.engine.loadings(count)
    }

    /// Single eigenvector by zero-based index.
    pub fn loading(&mut self, index: usize) -> anyhow::Result<Array1<T>> {
        self.ensure_derived()?;
        self.engine.loading(index)
    }

    /// Projects the observations onto the top `count` components
    /// (`0` = full dimension): data · loadingsᵀ, an `observations × count`
    /// score matrix.
    pub fn principal_components(&mut self, count: usize) -> anyhow::Result<Array2<T>> {
        self.ensure_derived()?;
        let target = self.engine.resolve_count(count)?;
        let loadings = self.engine.loadings(count)?;
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no data matrix has been set"))?;
        Ok(data.dot(&loadings.slice(s![..target, ..]).t()))
    }

    /// Projection onto a single component: data · vᵀ for the eigenvector at
    /// `index`, one score per observation.
    pub fn principal_component(&mut self, index: usize) -> anyhow::Result<Array1<T>> {
        self.ensure_derived()?;
        let vector = self.engine.loading(index)?;
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no data matrix has been set"))?;
        Ok(data.dot(&vector))
    }
}
