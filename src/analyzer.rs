use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::coverage::{build_matrix, CoverageMatrix};
use crate::discovery::FileDiscovery;
use crate::error::{Result, SpeclensError};
use crate::extract::PatternExtractor;
use crate::metadata::{TestMetadata, TestMetadataBuilder};
use crate::resolve::PathResolver;
use crate::store::ResultsStore;

/// Shape handed to the dashboard layer: the analyzed batch plus its
/// aggregated matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub tests_analyzed: usize,
    pub test_metadata: Vec<TestMetadata>,
    pub coverage_matrix: CoverageMatrix,
}

/// Facade over the whole pipeline: resolve, discover, analyze,
/// aggregate, persist. One run at a time; concurrent runs against the
/// same results directory are an operational error.
pub struct TestAnalyzer {
    resolver: PathResolver,
    discovery: FileDiscovery,
    store: ResultsStore,
}

impl TestAnalyzer {
    pub fn new(config: &Config) -> Self {
        Self {
            resolver: PathResolver::new(config.root_candidates.clone()),
            discovery: FileDiscovery::new(config.seed_subdirs.clone()),
            store: ResultsStore::new(config.results_dir.clone()),
        }
    }

    pub fn from_parts(
        resolver: PathResolver,
        discovery: FileDiscovery,
        store: ResultsStore,
    ) -> Self {
        Self {
            resolver,
            discovery,
            store,
        }
    }

    /// Run a full analysis batch and persist the results. Fails with
    /// `NoTestFilesFound` when discovery comes up empty; individual
    /// file failures only degrade their own record.
    pub async fn run(&self) -> Result<AnalysisReport> {
        let root = self.resolver.resolve();
        // Discovery canonicalizes its results; keep the root in the
        // same form so relative file keys stay clean.
        let root = root.canonicalize().unwrap_or(root);
        info!(root = %root.display(), "starting analysis run");

        let files = self.discovery.discover(&root);
        if files.is_empty() {
            return Err(SpeclensError::NoTestFilesFound {
                root: root.display().to_string(),
            });
        }
        info!(count = files.len(), "discovered test files");

        let builder = TestMetadataBuilder::new(root, PatternExtractor::new()?);
        let mut batch = Vec::with_capacity(files.len());
        for file in &files {
            batch.push(builder.build(file).await);
        }

        let matrix = build_matrix(&batch);
        self.store.save(&batch, &matrix).await?;

        Ok(AnalysisReport {
            tests_analyzed: batch.len(),
            test_metadata: batch,
            coverage_matrix: matrix,
        })
    }

    /// Return the last persisted results without re-scanning.
    pub async fn load_last(&self) -> Result<AnalysisReport> {
        let (batch, matrix) = self.store.load().await?;
        Ok(AnalysisReport {
            tests_analyzed: batch.len(),
            test_metadata: batch,
            coverage_matrix: matrix,
        })
    }
}
