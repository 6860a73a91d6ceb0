use thiserror::Error;

/// Failure kinds shared by the matrix builders and the eigen engines.
///
/// All of these are contract violations in the input data or the request,
/// not transient faults; they are raised at the earliest point of detection
/// and propagate to the caller unchanged. Callers holding an
/// `anyhow::Error` can recover the kind with `downcast_ref::<SpectralError>()`.
#[derive(Debug, Error)]
pub enum SpectralError {
    #[error("{context}: dimension mismatch (expected {expected}, found {found})")]
    DimensionMismatch {
        context: &'static str,
        expected: String,
        found: String,
    },

    #[error("index {index} out of range ({len} components supported)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("numerical degeneracy: {context}")]
    NumericDegeneracy { context: String },
}
