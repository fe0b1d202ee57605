//! HTTP client that turns every failure into a [`FetchError`].

use anyhow::Result;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::error::FetchError;

/// Thin wrapper over a reqwest Client. One request per call: no retry, no backoff.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    ///
    /// The body is parsed in two steps so that a body that is not JSON at all
    /// ([`FetchError::Decode`]) can be told apart from JSON of the wrong shape
    /// ([`FetchError::Shape`]).
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()).into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        let parsed = serde_json::from_value(value).map_err(|e| FetchError::Shape(e.to_string()))?;

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::classify_error;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct TestResponse {
        name: String,
        value: i32,
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: TestResponse = client.get_json(&format!("{}/test", url)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            TestResponse {
                name: "test".to_string(),
                value: 42
            }
        );
    }

    #[tokio::test]
    async fn test_get_json_not_found() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let err = client
            .get_json::<serde_json::Value>(&format!("{}/test", url))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(classify_error(&err), Some(&FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_get_json_server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let err = client
            .get_json::<serde_json::Value>(&format!("{}/test", url))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(classify_error(&err), Some(&FetchError::Status(503)));
    }

    #[tokio::test]
    async fn test_get_json_invalid_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_body("<html>rate limited</html>")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let err = client
            .get_json::<TestResponse>(&format!("{}/test", url))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(classify_error(&err), Some(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_get_json_wrong_shape() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_body(r#"{"name": "test"}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let err = client
            .get_json::<TestResponse>(&format!("{}/test", url))
            .await
            .unwrap_err();

        mock.assert_async().await;
        let classified = classify_error(&err).unwrap();
        assert!(classified.is_malformed());
        assert!(classified.to_string().contains("value"));
    }

    #[tokio::test]
    async fn test_get_json_connection_refused() {
        let client = HttpClient::new(Client::new());
        let err = client
            .get_json::<serde_json::Value>("http://127.0.0.1:1/test")
            .await
            .unwrap_err();

        assert!(matches!(classify_error(&err), Some(FetchError::Request(_))));
    }
}
