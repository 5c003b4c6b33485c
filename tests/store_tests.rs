use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use speclens::coverage::{build_matrix, CoverageMatrix};
use speclens::metadata::{CoverageRef, FunctionalArea, Selector, SelectorKind, TestMetadata, TestType};
use speclens::store::{ResultsStore, MATRIX_FILE, METADATA_FILE};
use speclens::SpeclensError;

fn sample_record(file: &str, test_type: TestType) -> TestMetadata {
    TestMetadata {
        file: file.to_string(),
        path: format!("/work/app/{file}"),
        name: file.to_string(),
        title: "Login flow".to_string(),
        description: "submits credentials".to_string(),
        test_type,
        selectors: vec![Selector {
            kind: SelectorKind::TestId,
            value: "submit".to_string(),
            usage: "locator".to_string(),
            line: 4,
        }],
        assertions: Vec::new(),
        dependencies: vec!["@playwright/test".to_string()],
        timeouts: vec![30000],
        screenshots: true,
        complexity: 1,
        line_count: 12,
        updated_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        functional_areas: vec![FunctionalArea::Authentifizierung],
        coverage: CoverageRef {
            area: vec![FunctionalArea::Authentifizierung],
            types: vec![test_type],
        },
        error: None,
    }
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = ResultsStore::new(dir.path().join("results"));

    let batch = vec![
        sample_record("login.spec.ts", TestType::Ui),
        sample_record("api.test.ts", TestType::Funktional),
    ];
    let matrix = build_matrix(&batch);

    store.save(&batch, &matrix).await.unwrap();
    let (loaded_batch, loaded_matrix) = store.load().await.unwrap();

    assert_eq!(loaded_batch, batch);
    assert_eq!(loaded_matrix, matrix);
}

#[tokio::test]
async fn test_load_without_prior_run_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = ResultsStore::new(dir.path().join("results"));

    let err = store.load().await.unwrap_err();
    assert!(matches!(err, SpeclensError::ResultsNotFound { .. }));
}

#[tokio::test]
async fn test_missing_matrix_document_defaults_to_zero_counts() {
    let dir = TempDir::new().unwrap();
    let store = ResultsStore::new(dir.path().join("results"));

    let batch = vec![sample_record("login.spec.ts", TestType::Ui)];
    store.save(&batch, &build_matrix(&batch)).await.unwrap();
    std::fs::remove_file(dir.path().join("results").join(MATRIX_FILE)).unwrap();

    let (loaded_batch, loaded_matrix) = store.load().await.unwrap();

    assert_eq!(loaded_batch, batch);
    assert_eq!(loaded_matrix, CoverageMatrix::default());
    assert!(loaded_matrix.coverage.values().all(|&c| c == 0));
}

#[tokio::test]
async fn test_matrix_write_failure_keeps_metadata_save() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results");
    let store = ResultsStore::new(&results);

    // Occupy the matrix path with a directory so the write fails.
    std::fs::create_dir_all(results.join(MATRIX_FILE)).unwrap();

    let batch = vec![sample_record("login.spec.ts", TestType::Ui)];
    store.save(&batch, &build_matrix(&batch)).await.unwrap();

    assert!(results.join(METADATA_FILE).exists());

    // Clear the obstruction; the metadata document must have survived.
    std::fs::remove_dir(results.join(MATRIX_FILE)).unwrap();
    let (loaded_batch, loaded_matrix) = store.load().await.unwrap();
    assert_eq!(loaded_batch, batch);
    assert_eq!(loaded_matrix, CoverageMatrix::default());
}

#[tokio::test]
async fn test_ensure_results_dir_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = ResultsStore::new(dir.path().join("results"));

    store.ensure_results_dir().await.unwrap();
    store.ensure_results_dir().await.unwrap();

    assert!(dir.path().join("results").is_dir());
}

#[tokio::test]
async fn test_save_overwrites_prior_content() {
    let dir = TempDir::new().unwrap();
    let store = ResultsStore::new(dir.path().join("results"));

    let first = vec![
        sample_record("a.spec.ts", TestType::Ui),
        sample_record("b.spec.ts", TestType::Ui),
    ];
    store.save(&first, &build_matrix(&first)).await.unwrap();

    let second = vec![sample_record("c.spec.ts", TestType::Integration)];
    store.save(&second, &build_matrix(&second)).await.unwrap();

    let (loaded, matrix) = store.load().await.unwrap();
    assert_eq!(loaded, second);
    assert_eq!(matrix.coverage["Integration"], 1);
    assert_eq!(matrix.coverage["UI"], 0);
}
