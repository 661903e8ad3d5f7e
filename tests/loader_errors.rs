// File: tests/loader_errors.rs
use leadboard::errors::{FetchErrorKind, LoadError};
use leadboard::loader::{Loader, ParseOptions, Source};
use leadboard::model::ColumnMap;
use leadboard::source::FileSource;
use std::path::PathBuf;
use std::sync::Arc;

fn file_loader() -> Loader {
    Loader::new(
        Arc::new(FileSource),
        ParseOptions::default(),
        ColumnMap::default(),
    )
}

fn temp_csv(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("leadboard_{}.csv", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_header_only_is_empty_dataset() {
    let err = file_loader()
        .load(&Source::Text("name,email,status\n".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::EmptyDataset));
}

#[tokio::test]
async fn test_blank_inputs_are_empty_source() {
    let loader = file_loader();
    for source in [
        Source::Text(String::new()),
        Source::Text("  \n".into()),
        Source::Locator("   ".into()),
    ] {
        let err = loader.load(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::EmptySource), "{:?}", source);
    }
}

#[tokio::test]
async fn test_empty_file_is_empty_dataset() {
    let path = temp_csv("");
    let err = file_loader()
        .load(&Source::Locator(path.display().to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::EmptyDataset));
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_html_payload_is_rejected() {
    let err = file_loader()
        .load(&Source::Text(
            "<!DOCTYPE html>\n<html><body>Sign in</body></html>".into(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::HtmlPayload));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let path = std::env::temp_dir().join(format!("leadboard_nope_{}.csv", uuid::Uuid::new_v4()));
    let err = file_loader()
        .load(&Source::Locator(path.display().to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.fetch_kind(), Some(FetchErrorKind::NotFound));
    assert!(err.to_string().starts_with("CSV file not found"));
}

#[tokio::test]
async fn test_file_load_normalizes_rows() {
    let path = temp_csv(
        "# export\nname,data,tags\nAna,05/03/2024,\"vip,  quente ,\"\nBia,31/02/2024,\n",
    );
    let outcome = file_loader()
        .load(&Source::Locator(path.display().to_string()))
        .await
        .unwrap();
    assert_eq!(outcome.records.len(), 2);

    let ana = &outcome.records[0];
    assert_eq!(ana.tags, vec!["vip", "quente"]);
    assert!(ana.parsed_date.is_some());
    assert_eq!(ana.text("data").as_deref(), Some("05/03/2024"));

    let bia = &outcome.records[1];
    assert!(bia.tags.is_empty());
    assert_eq!(bia.parsed_date, None);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_ragged_rows_are_warnings() {
    let outcome = file_loader()
        .load(&Source::Text("name,status\nAna\nBia,Ganho\n".into()))
        .await
        .unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].line, Some(2));
}
