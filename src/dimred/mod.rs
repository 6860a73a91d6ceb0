//! # Dimensionality Reduction
//!
//! Algorithms that project high-dimensional tabular data onto a small number
//! of dominant directions, built on the shared incremental eigen engine:
//! components are extracted on demand and a later request for more of them
//! extends the existing decomposition by spectral deflation instead of
//! recomputing it.
//!
//! ## Currently Available
//! - **PCA** ([`pca`]): Principal Component Analysis over the sample
//!   covariance of the data columns
//! - **MDS** ([`mds`]): classical multidimensional scaling over the
//!   double-centred Gramian of a pairwise distance matrix
//!
//! ## Planned Implementations
//! - **Sammon mapping**: iterative stress-minimising embedding
//! - **Kernel regression**: non-parametric regression over the same
//!   distance machinery
//!
//! ## Algorithm Selection Guide
//! - Use **PCA** when directions in feature space matter (loadings are
//!   interpretable as feature weights)
//! - Use **MDS** when only pairwise dissimilarities are meaningful and the
//!   goal is a coordinate embedding that preserves them

mod engine;

pub mod mds;
pub mod pca;
