use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::coverage::CoverageMatrix;
use crate::error::{Result, SpeclensError};
use crate::metadata::TestMetadata;

/// Metadata batch document, one JSON array of records.
pub const METADATA_FILE: &str = "test-analysis.json";

/// Coverage matrix document. Optional on load: older result sets may
/// not carry it.
pub const MATRIX_FILE: &str = "coverage-matrix.json";

/// Persists an analysis batch and its matrix under the results
/// directory, and reloads them on demand.
pub struct ResultsStore {
    dir: PathBuf,
}

impl ResultsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.dir.join(MATRIX_FILE)
    }

    /// Create the results directory if absent. Idempotent.
    pub async fn ensure_results_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(|err| {
            SpeclensError::PersistenceError(format!(
                "Failed to create results directory {}: {err}",
                self.dir.display()
            ))
        })
    }

    /// Overwrite both documents. The two writes are independent: a
    /// failed matrix write is logged but does not discard an already
    /// successful metadata save.
    pub async fn save(&self, batch: &[TestMetadata], matrix: &CoverageMatrix) -> Result<()> {
        self.ensure_results_dir().await?;

        let metadata_json = serde_json::to_string_pretty(batch)?;
        fs::write(self.metadata_path(), metadata_json)
            .await
            .map_err(|err| {
                SpeclensError::PersistenceError(format!(
                    "Failed to write {}: {err}",
                    self.metadata_path().display()
                ))
            })?;

        match write_matrix(&self.matrix_path(), matrix).await {
            Ok(()) => {}
            Err(err) => {
                warn!(
                    path = %self.matrix_path().display(),
                    error = %err,
                    "coverage matrix write failed, metadata save kept"
                );
            }
        }

        info!(
            records = batch.len(),
            dir = %self.dir.display(),
            "analysis results saved"
        );
        Ok(())
    }

    /// Load the last-saved batch and matrix. Fails with
    /// `ResultsNotFound` when the metadata document is missing; a
    /// missing matrix document defaults to all-zero counts.
    pub async fn load(&self) -> Result<(Vec<TestMetadata>, CoverageMatrix)> {
        let metadata_path = self.metadata_path();
        if !metadata_path.exists() {
            return Err(SpeclensError::ResultsNotFound {
                path: metadata_path.display().to_string(),
            });
        }

        let metadata_json = fs::read_to_string(&metadata_path).await?;
        let batch: Vec<TestMetadata> = serde_json::from_str(&metadata_json)?;

        let matrix_path = self.matrix_path();
        let matrix = if matrix_path.exists() {
            let matrix_json = fs::read_to_string(&matrix_path).await?;
            serde_json::from_str(&matrix_json)?
        } else {
            CoverageMatrix::default()
        };

        Ok((batch, matrix))
    }
}

async fn write_matrix(path: &Path, matrix: &CoverageMatrix) -> Result<()> {
    let json = serde_json::to_string_pretty(matrix)?;
    fs::write(path, json).await?;
    Ok(())
}
