use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use speclens::analyzer::TestAnalyzer;
use speclens::discovery::FileDiscovery;
use speclens::metadata::{FunctionalArea, SelectorKind, TestType};
use speclens::resolve::PathResolver;
use speclens::store::{ResultsStore, MATRIX_FILE, METADATA_FILE};
use speclens::SpeclensError;

const LOGIN_SPEC: &str = r#"import { test, expect } from '@playwright/test';

test.describe("Login flow", () => {
  test("submits credentials", async ({ page }) => {
    await page.getByTestId("submit").click();
    expect(x).toBe(true);
    expect(y).toBe(true);
  });
});
"#;

const FUNCTIONAL_SPEC: &str = r#"import { computeTotals } from './totals';

test('sums dashboard totals', () => {
  expect(computeTotals([1, 2])).toEqual(3);
}, { timeout: 5000 });
"#;

const UNCLASSIFIED_SPEC: &str = "const fixtures = ['a', 'b'];\nexport default fixtures;\n";

/// Workspace with a nested scan root and a private results directory.
struct Workspace {
    _temp: TempDir,
    root: PathBuf,
    results: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project").join("app");
        fs::create_dir_all(&root).unwrap();
        let results = temp.path().join("project").join("out");
        Self {
            _temp: temp,
            root,
            results,
        }
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
    }

    fn analyzer(&self) -> TestAnalyzer {
        TestAnalyzer::from_parts(
            PathResolver::new(vec![self.root.clone()]),
            FileDiscovery::new(vec!["tests".to_string(), "e2e".to_string()]),
            ResultsStore::new(self.results.clone()),
        )
    }
}

#[tokio::test]
async fn test_full_pipeline_produces_batch_matrix_and_documents() {
    let ws = Workspace::new();
    ws.write("login.spec.ts", LOGIN_SPEC);
    ws.write("totals.test.ts", FUNCTIONAL_SPEC);
    ws.write("fixtures.spec.ts", UNCLASSIFIED_SPEC);

    let report = ws.analyzer().run().await.unwrap();

    assert_eq!(report.tests_analyzed, 3);
    assert_eq!(report.test_metadata.len(), 3);

    let login = report
        .test_metadata
        .iter()
        .find(|r| r.name == "login.spec.ts")
        .unwrap();
    assert_eq!(login.test_type, TestType::Ui);
    assert_eq!(login.title, "Login flow");
    assert_eq!(login.selectors.len(), 1);
    assert_eq!(login.selectors[0].kind, SelectorKind::TestId);
    assert_eq!(login.complexity, 3);
    assert!(login
        .functional_areas
        .contains(&FunctionalArea::Authentifizierung));

    let totals = report
        .test_metadata
        .iter()
        .find(|r| r.name == "totals.test.ts")
        .unwrap();
    assert_eq!(totals.test_type, TestType::Funktional);
    assert_eq!(totals.timeouts, vec![5000]);
    assert!(totals
        .functional_areas
        .contains(&FunctionalArea::Dashboard));

    let fixtures = report
        .test_metadata
        .iter()
        .find(|r| r.name == "fixtures.spec.ts")
        .unwrap();
    assert_eq!(fixtures.test_type, TestType::Unbekannt);
    assert!(fixtures.error.is_none());

    // Unbekannt records are invisible to the matrix.
    let matrix = &report.coverage_matrix;
    assert_eq!(matrix.coverage["UI"], 1);
    assert_eq!(matrix.coverage["Funktional"], 1);
    assert_eq!(matrix.coverage["Integration"], 0);
    assert!(matrix.coverage.values().sum::<usize>() < report.tests_analyzed);

    assert!(ws.results.join(METADATA_FILE).exists());
    assert!(ws.results.join(MATRIX_FILE).exists());
}

#[tokio::test]
async fn test_unique_file_keys_and_relative_paths() {
    let ws = Workspace::new();
    ws.write("login.spec.ts", LOGIN_SPEC);
    ws.write("sub/inner.spec.ts", FUNCTIONAL_SPEC);

    let report = ws.analyzer().run().await.unwrap();

    let mut files: Vec<_> = report
        .test_metadata
        .iter()
        .map(|r| r.file.clone())
        .collect();
    files.sort();
    files.dedup();
    assert_eq!(files.len(), report.tests_analyzed);
    assert!(report
        .test_metadata
        .iter()
        .any(|r| r.file == format!("sub{}inner.spec.ts", std::path::MAIN_SEPARATOR)));
}

#[tokio::test]
async fn test_degraded_record_does_not_abort_the_batch() {
    let ws = Workspace::new();
    ws.write("login.spec.ts", LOGIN_SPEC);
    fs::write(ws.root.join("broken.spec.ts"), [0xFF, 0xFE, 0xFD]).unwrap();

    let report = ws.analyzer().run().await.unwrap();

    assert_eq!(report.tests_analyzed, 2);
    let broken = report
        .test_metadata
        .iter()
        .find(|r| r.name == "broken.spec.ts")
        .unwrap();
    assert!(broken.error.is_some());
    assert_eq!(broken.test_type, TestType::Unbekannt);
    assert_eq!(broken.complexity, 0);

    let login = report
        .test_metadata
        .iter()
        .find(|r| r.name == "login.spec.ts")
        .unwrap();
    assert!(login.error.is_none());
}

#[tokio::test]
async fn test_empty_root_yields_no_files_found() {
    let ws = Workspace::new();

    let err = ws.analyzer().run().await.unwrap_err();
    assert!(matches!(err, SpeclensError::NoTestFilesFound { .. }));
}

#[tokio::test]
async fn test_runs_are_idempotent_over_an_unchanged_tree() {
    let ws = Workspace::new();
    ws.write("login.spec.ts", LOGIN_SPEC);
    ws.write("totals.test.ts", FUNCTIONAL_SPEC);

    let first = ws.analyzer().run().await.unwrap();
    let second = ws.analyzer().run().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_load_last_round_trips_the_run_report() {
    let ws = Workspace::new();
    ws.write("login.spec.ts", LOGIN_SPEC);

    let run_report = ws.analyzer().run().await.unwrap();
    let loaded = ws.analyzer().load_last().await.unwrap();

    assert_eq!(loaded, run_report);
}

#[tokio::test]
async fn test_load_last_without_prior_run_is_not_found() {
    let ws = Workspace::new();

    let err = ws.analyzer().load_last().await.unwrap_err();
    assert!(matches!(err, SpeclensError::ResultsNotFound { .. }));
}
