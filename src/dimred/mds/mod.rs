//! # Classical Multidimensional Scaling
//!
//! Recovers point coordinates from pairwise distances: `set_matrix` eagerly
//! computes the distance matrix of the data rows under the configured norm,
//! the double-centred Gramian is derived lazily, and its eigenvectors are the
//! embedding axes. Eigenpairs are extracted incrementally, exactly as in the
//! PCA engine.

use std::sync::Arc;

use log::debug;
use ndarray::{s, Array1, Array2};

use crate::dense::{gramian, pairwise_distance, render};
use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::dimred::engine::EigenEngine;
use crate::eigen::{EigenPair, EigenSolve};
use crate::norm::{Euclidean, VectorNorm};
use crate::FloatOps;

/// Builder for configuring and creating [`Mds`] instances.
pub struct MdsBuilder<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    solver: Arc<S>,
    norm: Arc<dyn VectorNorm<T>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<T, S> MdsBuilder<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    pub fn new(solver: S) -> Self {
        Self {
            solver: Arc::new(solver),
            norm: Arc::new(Euclidean),
            sink: Arc::new(NoopSink),
        }
    }

    /// Sets the vector norm used for the pairwise distances and eigenvector
    /// scaling. Defaults to [`Euclidean`].
    pub fn norm<N: VectorNorm<T> + 'static>(mut self, norm: N) -> Self {
        self.norm = Arc::new(norm);
        self
    }

    /// Sets the sink receiving distance/Gramian snapshots. Defaults to
    /// [`NoopSink`], which discards them.
    pub fn diagnostics<D: DiagnosticSink + 'static>(mut self, sink: D) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn build(self) -> Mds<T, S> {
        Mds {
            dist: None,
            engine: EigenEngine::new(self.solver, self.norm),
            sink: self.sink,
        }
    }
}

/// Classical MDS engine.
///
/// Owns the pairwise distance matrix, a lazily-computed Gramian, and the
/// incrementally-growing eigenpair sequence. Accessors take `&mut self` for
/// the same reason as in [`crate::dimred::pca::Pca`]: any of them may extend
/// the cache.
pub struct Mds<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    dist: Option<Array2<T>>,
    engine: EigenEngine<T, S>,
    sink: Arc<dyn DiagnosticSink>,
}

impl<T, S> Mds<T, S>
where
    T: FloatOps,
    S: EigenSolve<T>,
{
    /// Replaces the raw data, discarding all cached state, and eagerly
    /// computes the pairwise distance matrix of its rows. The distance
    /// matrix snapshot is offered to the diagnostic sink as `"dist"`.
    pub fn set_matrix(&mut self, data: Array2<T>) -> anyhow::Result<()> {
        self.engine.reset();
        self.dist = None;

        let dist = pairwise_distance(data.view(), data.view(), &**self.engine.norm_ref())?;
        debug!("computed {}x{} distance matrix", dist.nrows(), dist.ncols());
        self.sink.record("dist", &render(dist.view()))?;
        self.dist = Some(dist);
        Ok(())
    }

    pub fn dist_matrix(&self) -> Option<&Array2<T>> {
        self.dist.as_ref()
    }

    fn ensure_derived(&mut self) -> anyhow::Result<()> {
        if self.engine.has_derived() {
            return Ok(());
        }
        let dist = self
            .dist
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no data matrix has been set"))?;
        let gram = gramian(dist.view())?;
        debug!("computed {}x{} gramian matrix", gram.nrows(), gram.ncols());
        self.sink.record("gram", &render(gram.view()))?;
        self.engine.set_derived(gram);
        Ok(())
    }

    /// The double-centred Gramian, computed and cached on first call. The
    /// snapshot is offered to the diagnostic sink as `"gram"`.
    pub fn gramian_matrix(&mut self) -> anyhow::Result<&Array2<T>> {
        self.ensure_derived()?;
        self.engine.derived_ref()
    }

    /// At least `count` eigenpairs of the Gramian in descending magnitude
    /// order (`0` = every supported component). Returns the whole cached
    /// sequence, which may be longer than requested.
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

    /// Embedding coordinates for the top `count` axes (`0` = full
    /// dimension): the transposed loadings, one row per observation. The
    /// Gramian eigenvectors already are point coordinates up to scaling, so
    /// no multiplication by the raw data happens here.
    pub fn principal_components(&mut self, count: usize) -> anyhow::Result<Array2<T>> {
        self.ensure_derived()?;
        let target = self.engine.resolve_count(count)?;
        let loadings = self.engine.loadings(count)?;
        Ok(loadings.slice(s![..target, ..]).t().to_owned())
    }

    /// Single embedding axis: the transposed eigenvector at `index`, one
    /// coordinate per observation.
    pub fn principal_component(&mut self, index: usize) -> anyhow::Result<Array1<T>> {
        self.ensure_derived()?;
        self.engine.loading(index)
    }
}
