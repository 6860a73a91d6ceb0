//! Optional sinks for intermediate-matrix snapshots.
//!
//! The MDS engine offers its distance and Gramian matrices to a
//! [`DiagnosticSink`] as they are computed. The default sink discards them;
//! [`DirectorySink`] writes one file per label into a caller-chosen
//! directory, so concurrent engine instances never contend on a fixed path.

use std::fs;
use std::path::PathBuf;

use log::debug;

pub trait DiagnosticSink: Send + Sync {
    fn record(&self, label: &str, rendered: &str) -> anyhow::Result<()>;
}

/// Discards every snapshot. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _label: &str, _rendered: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writes each snapshot to `<dir>/<label>.dat`, creating the directory on
/// first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DiagnosticSink for DirectorySink {
    fn record(&self, label: &str, rendered: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.dat", label));
        fs::write(&path, rendered)?;
        debug!("wrote diagnostic snapshot {}", path.display());
        Ok(())
    }
}
