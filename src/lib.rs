//! speclens - UI-Test Metadata Extractor and Coverage Aggregator
//!
//! Walks a source tree for UI test specification files, extracts
//! structural facts from their text (selectors, assertions,
//! dependencies, timeouts, functional classification) by lexical
//! pattern matching, and aggregates the batch into a coverage matrix
//! persisted for dashboard consumption.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod resolve;
pub mod store;

// Re-export commonly used types
pub use analyzer::{AnalysisReport, TestAnalyzer};
pub use config::Config;
pub use coverage::{build_matrix, CoverageMatrix, QualityMetrics};
pub use discovery::FileDiscovery;
pub use error::{Result, SpeclensError};
pub use extract::{Extraction, PatternExtractor};
pub use metadata::{
    Assertion, FunctionalArea, Selector, SelectorKind, TestMetadata, TestMetadataBuilder, TestType,
};
pub use resolve::PathResolver;
pub use store::ResultsStore;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Default results directory
    pub const DEFAULT_RESULTS_DIR: &str = "./results";

    /// Default config filename
    pub const DEFAULT_CONFIG_NAME: &str = "config.toml";
}
