use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metadata::{TestMetadata, TestType};

/// The fixed matrix buckets. These carry test-type names, not
/// functional areas; the naming mismatch is inherited from the
/// dashboard's data contract and preserved deliberately.
pub const MATRIX_AREAS: &[&str] = &["UI", "Funktional", "Integration"];

/// Fixed-shape count table summarizing a batch by test-type bucket.
/// Unbekannt-typed records fall outside every bucket, so the counts
/// may sum to less than the batch size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMatrix {
    pub areas: Vec<String>,
    pub coverage: BTreeMap<String, usize>,
}

impl Default for CoverageMatrix {
    fn default() -> Self {
        Self {
            areas: MATRIX_AREAS.iter().map(|a| a.to_string()).collect(),
            coverage: MATRIX_AREAS.iter().map(|a| (a.to_string(), 0)).collect(),
        }
    }
}

/// Aggregate a metadata batch into the coverage matrix. Pure and
/// total: an empty batch yields all-zero counts.
pub fn build_matrix(batch: &[TestMetadata]) -> CoverageMatrix {
    let mut matrix = CoverageMatrix::default();
    for record in batch {
        if let Some(count) = matrix.coverage.get_mut(&record.test_type.to_string()) {
            *count += 1;
        }
    }
    matrix
}

/// Count of selectors per selector kind across a batch.
pub fn selector_type_tally(batch: &[TestMetadata]) -> BTreeMap<String, usize> {
    let mut tally = BTreeMap::new();
    for record in batch {
        for selector in &record.selectors {
            *tally
                .entry(selector.kind.as_str().to_string())
                .or_insert(0) += 1;
        }
    }
    tally
}

/// Count of assertions per assertion type across a batch.
pub fn assertion_type_tally(batch: &[TestMetadata]) -> BTreeMap<String, usize> {
    let mut tally = BTreeMap::new();
    for record in batch {
        for assertion in &record.assertions {
            *tally.entry(assertion.kind.clone()).or_insert(0) += 1;
        }
    }
    tally
}

/// Aggregate quality numbers over one analysis batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub tests_analyzed: usize,
    pub total_selectors: usize,
    pub total_assertions: usize,
    pub average_complexity: f64,
    pub with_screenshots: usize,
    pub degraded: usize,
    pub unclassified: usize,
}

impl QualityMetrics {
    pub fn compute(batch: &[TestMetadata]) -> Self {
        let total_selectors: usize = batch.iter().map(|r| r.selectors.len()).sum();
        let total_assertions: usize = batch.iter().map(|r| r.assertions.len()).sum();
        let total_complexity: usize = batch.iter().map(|r| r.complexity).sum();
        let average_complexity = if batch.is_empty() {
            0.0
        } else {
            total_complexity as f64 / batch.len() as f64
        };
        Self {
            tests_analyzed: batch.len(),
            total_selectors,
            total_assertions,
            average_complexity,
            with_screenshots: batch.iter().filter(|r| r.screenshots).count(),
            degraded: batch.iter().filter(|r| r.error.is_some()).count(),
            unclassified: batch
                .iter()
                .filter(|r| r.test_type == TestType::Unbekannt)
                .count(),
        }
    }
}
