// File: tests/http_source.rs
// HTTP retrieval against a local mock server.
use leadboard::errors::{FetchErrorKind, LoadError};
use leadboard::loader::{Loader, ParseOptions, Source};
use leadboard::model::ColumnMap;
use leadboard::source::{DefaultSource, HttpSource, TabularSource};
use leadboard::store::LeadStore;
use std::sync::Arc;
use std::time::Duration;

fn http_loader(timeout: Duration) -> Loader {
    Loader::new(
        Arc::new(DefaultSource::new(HttpSource::new(timeout))),
        ParseOptions::default(),
        ColumnMap::default(),
    )
}

#[tokio::test]
async fn test_404_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/leads.csv")
        .with_status(404)
        .create_async()
        .await;

    let err = http_loader(Duration::from_secs(5))
        .load(&Source::Locator(format!("{}/leads.csv", server.url())))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.fetch_kind(), Some(FetchErrorKind::NotFound));
}

#[tokio::test]
async fn test_403_is_forbidden() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/private.csv")
        .with_status(403)
        .create_async()
        .await;

    let failure = HttpSource::new(Duration::from_secs(5))
        .fetch_text(&format!("{}/private.csv", server.url()))
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FetchErrorKind::Forbidden);
    assert_eq!(failure.status, Some(403));
}

#[tokio::test]
async fn test_server_error_is_unknown() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/leads.csv")
        .with_status(500)
        .create_async()
        .await;

    let failure = HttpSource::new(Duration::from_secs(5))
        .fetch_text(&format!("{}/leads.csv", server.url()))
        .await
        .unwrap_err();
    assert_eq!(failure.kind, FetchErrorKind::Unknown);
    assert!(failure.message.contains("500"));
}

#[tokio::test]
async fn test_200_loads_into_store() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/leads.csv")
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body("name,status,tags\nAna,Aberto,vip\nBia,Ganho,\n")
        .create_async()
        .await;

    let loader = http_loader(Duration::from_secs(5));
    let mut store = LeadStore::new();
    let records = store
        .load(&loader, &Source::Locator(format!("{}/leads.csv", server.url())))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(store.unique_tags(), vec!["vip"]);
    assert_eq!(store.unique_statuses(), vec!["Aberto", "Ganho"]);
}

#[tokio::test]
async fn test_html_login_page_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/leads.csv")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<!doctype html><html><body>Please log in</body></html>")
        .create_async()
        .await;

    let err = http_loader(Duration::from_secs(5))
        .load(&Source::Locator(format!("{}/leads.csv", server.url())))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::HtmlPayload));
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let holder = tokio::spawn(async move {
        // Accept and never answer.
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let failure = HttpSource::new(Duration::from_millis(200))
        .fetch_text(&format!("http://{}/leads.csv", addr))
        .await
        .unwrap_err();
    assert_eq!(failure.kind, FetchErrorKind::Timeout);

    holder.abort();
}

#[tokio::test]
async fn test_locators_fall_through_to_first_valid_csv() {
    let mut server = mockito::Server::new_async().await;
    let missing = server
        .mock("GET", "/old/leads.csv")
        .with_status(404)
        .create_async()
        .await;
    let not_csv = server
        .mock("GET", "/readme.txt")
        .with_status(200)
        .with_body("nothing tabular here\n")
        .create_async()
        .await;
    let good = server
        .mock("GET", "/leads.csv")
        .with_status(200)
        .with_body("name,status\nAna,Aberto\n")
        .create_async()
        .await;

    let locators = vec![
        format!("{}/old/leads.csv", server.url()),
        format!("{}/readme.txt", server.url()),
        format!("{}/leads.csv", server.url()),
    ];
    let outcome = http_loader(Duration::from_secs(5))
        .load(&Source::Locators(locators))
        .await
        .unwrap();

    missing.assert_async().await;
    not_csv.assert_async().await;
    good.assert_async().await;
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_locators_report_last_failure() {
    let mut server = mockito::Server::new_async().await;
    let _html = server
        .mock("GET", "/login")
        .with_status(200)
        .with_body("<!DOCTYPE html><html></html>")
        .create_async()
        .await;
    let _gone = server
        .mock("GET", "/gone.csv")
        .with_status(403)
        .create_async()
        .await;

    let loader = http_loader(Duration::from_secs(5));
    let err = loader
        .load(&Source::Locators(vec![
            format!("{}/login", server.url()),
            format!("{}/gone.csv", server.url()),
        ]))
        .await
        .unwrap_err();
    assert_eq!(err.fetch_kind(), Some(FetchErrorKind::Forbidden));

    let err = loader
        .load(&Source::Locators(vec![
            format!("{}/gone.csv", server.url()),
            format!("{}/login", server.url()),
        ]))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::HtmlPayload));

    let err = loader.load(&Source::Locators(vec![])).await.unwrap_err();
    assert!(matches!(err, LoadError::EmptySource));
}
