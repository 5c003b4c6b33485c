use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::discovery::TEST_FILE_SUFFIXES;
use crate::extract::PatternExtractor;

/// How a selector locates its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectorKind {
    Css,
    TestId,
    Text,
    Role,
    Label,
    Placeholder,
    Xpath,
}

impl SelectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorKind::Css => "css",
            SelectorKind::TestId => "testId",
            SelectorKind::Text => "text",
            SelectorKind::Role => "role",
            SelectorKind::Label => "label",
            SelectorKind::Placeholder => "placeholder",
            SelectorKind::Xpath => "xpath",
        }
    }
}

/// One UI element locator found in a test file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    #[serde(rename = "type")]
    pub kind: SelectorKind,
    pub value: String,
    /// The action invoked on the element, "locator" when none was captured.
    pub usage: String,
    pub line: u32,
}

/// One expectation statement found in a test file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    /// Assertion verb plus trailing qualifier, e.g. "toBeVisible".
    #[serde(rename = "type")]
    pub kind: String,
    /// The asserted expression text, verbatim.
    pub condition: String,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestType {
    #[serde(rename = "UI")]
    Ui,
    Funktional,
    Integration,
    Unbekannt,
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestType::Ui => write!(f, "UI"),
            TestType::Funktional => write!(f, "Funktional"),
            TestType::Integration => write!(f, "Integration"),
            TestType::Unbekannt => write!(f, "Unbekannt"),
        }
    }
}

/// Product-domain tag inferred from keyword presence in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionalArea {
    Authentifizierung,
    Dashboard,
    Benutzerverwaltung,
}

impl std::fmt::Display for FunctionalArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionalArea::Authentifizierung => write!(f, "Authentifizierung"),
            FunctionalArea::Dashboard => write!(f, "Dashboard"),
            FunctionalArea::Benutzerverwaltung => write!(f, "Benutzerverwaltung"),
        }
    }
}

/// Cross-reference of functional areas against the file's test type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRef {
    pub area: Vec<FunctionalArea>,
    #[serde(rename = "type")]
    pub types: Vec<TestType>,
}

/// Everything extracted and derived from one analyzed test file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestMetadata {
    /// Path relative to the resolved scan root.
    pub file: String,
    /// Absolute path as discovered.
    pub path: String,
    /// Base filename.
    pub name: String,
    pub title: String,
    pub description: String,
    pub test_type: TestType,
    pub selectors: Vec<Selector>,
    pub assertions: Vec<Assertion>,
    pub dependencies: Vec<String>,
    pub timeouts: Vec<u64>,
    pub screenshots: bool,
    /// Always |selectors| + |assertions|.
    pub complexity: usize,
    pub line_count: usize,
    /// File modification time.
    pub updated_at: DateTime<Utc>,
    pub functional_areas: Vec<FunctionalArea>,
    pub coverage: CoverageRef,
    /// Present only when per-file analysis failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Strip a recognized test-file suffix from a filename.
pub fn strip_test_suffix(name: &str) -> &str {
    for suffix in TEST_FILE_SUFFIXES {
        if let Some(stem) = name.strip_suffix(suffix) {
            return stem;
        }
    }
    name
}

/// Builds one `TestMetadata` record per discovered file, isolating
/// per-file failures so a bad file never aborts the batch.
pub struct TestMetadataBuilder {
    root: PathBuf,
    extractor: PatternExtractor,
}

impl TestMetadataBuilder {
    pub fn new(root: PathBuf, extractor: PatternExtractor) -> Self {
        Self { root, extractor }
    }

    /// Analyze one file. Total: any failure is contained in a degraded
    /// record carrying the failure message in `error`.
    pub async fn build(&self, path: &Path) -> TestMetadata {
        match self.try_build(path).await {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    file = %path.display(),
                    error = %format!("{err:#}"),
                    "file analysis degraded"
                );
                self.degraded(path, &format!("{err:#}"))
            }
        }
    }

    async fn try_build(&self, path: &Path) -> Result<TestMetadata> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read test file: {}", path.display()))?;
        let meta = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat test file: {}", path.display()))?;
        let updated_at: DateTime<Utc> = meta
            .modified()
            .with_context(|| format!("No modification time for: {}", path.display()))?
            .into();

        let name = Self::file_name(path);
        let extraction = self.extractor.extract(&text);
        let test_type = self.extractor.classify_test_type(&text);
        let functional_areas = crate::extract::classify_functional_areas(&text);
        let title = self
            .extractor
            .extract_title(&text)
            .unwrap_or_else(|| strip_test_suffix(&name).to_string());
        let description = self.extractor.extract_description(&text).unwrap_or_default();
        let complexity = extraction.selectors.len() + extraction.assertions.len();

        Ok(TestMetadata {
            file: self.relative_file(path),
            path: path.display().to_string(),
            name,
            title,
            description,
            test_type,
            coverage: CoverageRef {
                area: functional_areas.clone(),
                types: vec![test_type],
            },
            selectors: extraction.selectors,
            assertions: extraction.assertions,
            dependencies: extraction.dependencies,
            timeouts: extraction.timeouts,
            screenshots: text.contains("screenshot"),
            complexity,
            line_count: text.lines().count(),
            updated_at,
            functional_areas,
            error: None,
        })
    }

    fn degraded(&self, path: &Path, message: &str) -> TestMetadata {
        let name = Self::file_name(path);
        let updated_at = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        TestMetadata {
            file: self.relative_file(path),
            path: path.display().to_string(),
            title: strip_test_suffix(&name).to_string(),
            name,
            description: String::new(),
            test_type: TestType::Unbekannt,
            selectors: Vec::new(),
            assertions: Vec::new(),
            dependencies: Vec::new(),
            timeouts: Vec::new(),
            screenshots: false,
            complexity: 0,
            line_count: 0,
            updated_at,
            functional_areas: Vec::new(),
            coverage: CoverageRef {
                area: Vec::new(),
                types: vec![TestType::Unbekannt],
            },
            error: Some(message.to_string()),
        }
    }

    fn relative_file(&self, path: &Path) -> String {
        pathdiff::diff_paths(path, &self.root)
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }
}
