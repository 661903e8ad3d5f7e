// File: ./src/source/http.rs
// Plain GET of an exported CSV over http(s).
use crate::errors::{FetchErrorKind, FetchFailure};
use crate::source::TabularSource;
use async_trait::async_trait;
use http::{Request, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::error::Error;
use std::time::Duration;

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct HttpSource {
    client: HttpsClient,
    timeout: Duration,
}

/// Joins an error with all of its sources; hyper's top-level messages are too terse
/// to classify on their own.
fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Self {
        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            log::warn!("No system certificates found; https sources will fail verification");
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https_connector);
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl TabularSource for HttpSource {
    async fn fetch_text(&self, locator: &str) -> Result<String, FetchFailure> {
        let uri: Uri = locator.parse().map_err(|e: http::uri::InvalidUri| {
            FetchFailure::new(
                FetchErrorKind::Unknown,
                format!("Invalid URL '{}': {}", locator, e),
            )
        })?;
        let request = Request::get(uri)
            .body(String::new())
            .map_err(|e| FetchFailure::new(FetchErrorKind::Unknown, e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| FetchFailure::from_message(error_chain(&e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchFailure::from_status(
                    status.as_u16(),
                    format!(
                        "HTTP error {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("unknown")
                    ),
                ));
            }

            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| FetchFailure::from_message(error_chain(&e)))?
                .to_bytes();
            Ok(String::from_utf8_lossy(&body).into_owned())
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(FetchFailure::new(
                FetchErrorKind::Timeout,
                format!(
                    "Request to {} timed out after {:.1}s",
                    locator,
                    self.timeout.as_secs_f32()
                ),
            )),
        }
    }
}
