//! HTTP transport used by the YouTube client.

use crate::error::{Result, YouTubeError};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Performs one GET request and decodes the JSON body.
///
/// [`HttpTransport`] is the production implementation; tests plug in canned
/// responses through this trait.
pub trait Transport: Send + Sync {
    fn get_json(&self, url: Url) -> impl Future<Output = Result<Value>> + Send;
}

/// `reqwest`-backed transport with TLS verification left on.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for API requests
    client: Client,
}

impl HttpTransport {
    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one shared with the rest of an application.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, url: Url) -> Result<Value> {
        // reqwest errors carry the request URL, which holds the API key.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body = if status.is_success() {
            response.text().await.map_err(reqwest::Error::without_url)?
        } else {
            response.text().await.unwrap_or_default()
        };

        decode_body(status, body)
    }
}

/// Map a response status and body to decoded JSON or an API error.
fn decode_body(status: StatusCode, body: String) -> Result<Value> {
    if !status.is_success() {
        return Err(YouTubeError::Api { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(5)).is_ok());
        let _ = HttpTransport::from_client(Client::new());
    }

    #[test]
    fn test_decode_body_error_status_keeps_body() {
        let body = r#"{"error":{"code":403,"message":"quotaExceeded"}}"#.to_string();
        match decode_body(StatusCode::FORBIDDEN, body.clone()) {
            Err(YouTubeError::Api { status, body: kept }) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(kept, body);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_body_rejects_non_json() {
        assert!(matches!(
            decode_body(StatusCode::OK, "<html>".to_string()),
            Err(YouTubeError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_body_valid_json() {
        let value = decode_body(StatusCode::OK, r#"{"items":[]}"#.to_string()).unwrap();
        assert_eq!(value, json!({ "items": [] }));
    }

    #[tokio::test]
    async fn test_connection_error_hides_api_key() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse("http://127.0.0.1:1/youtube/v3/search?q=rust&key=SECRET123").unwrap();

        let err = transport.get_json(url).await.unwrap_err();
        assert!(matches!(err, YouTubeError::Http(_)));
        assert!(!format!("{err}").contains("SECRET123"));
        assert!(!format!("{err:?}").contains("SECRET123"));
    }
}
