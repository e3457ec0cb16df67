//! Summary storage
//!
//! Persists measurement summaries as files named after the measurement and
//! the time it describes.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::measurement::Summary;

/// Writes summaries into a directory
pub struct SummaryWriter {
    /// Base directory for summaries
    base_dir: PathBuf,
}

impl SummaryWriter {
    /// Create a new writer
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path a summary is written to
    pub fn summary_path(&self, summary: &Summary) -> PathBuf {
        self.base_dir.join(summary.file_name())
    }

    /// Write a summary, returning its path
    pub fn write(&self, summary: &Summary) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!("Failed to create directory: {}", self.base_dir.display())
        })?;

        let path = self.summary_path(summary);
        fs::write(&path, summary.content())
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;

        info!("Saved {} summary to {}", summary.name(), path.display());
        Ok(path)
    }
}
