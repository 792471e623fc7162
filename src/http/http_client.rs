use std::time::{Duration, Instant};

use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::HttpError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// One upstream connection with retry and timeout policy applied.
pub struct HttpClient {
    base_url: Url,
    client: reqwest_middleware::ClientWithMiddleware,
}

impl HttpClient {
    pub fn new(base_url: Url) -> Result<Self, HttpError> {
        Self::with_config(base_url, DEFAULT_MAX_RETRIES, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_config(base_url: Url, max_retries: u32, timeout: Duration) -> Result<Self, HttpError> {
        let retry_policy = reqwest_retry::policies::ExponentialBackoff::builder().build_with_max_retries(max_retries);

        let inner_client = reqwest::Client::builder().timeout(timeout).build()?;

        let client = reqwest_middleware::ClientBuilder::new(inner_client)
            .with(reqwest_retry::RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { base_url, client })
    }

    /// Send a request relative to the base URL and decode the JSON response.
    ///
    /// `path` is joined onto the base URL, so a base URL with a path component
    /// must end in `/` for the path to be appended rather than replaced.
    pub async fn send_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, HttpError> {
        let start = Instant::now();
        let url = self.base_url.join(path)?;

        let req = match method {
            Method::GET => self.client.get(url.clone()),
            Method::POST => {
                let req = self.client.post(url.clone());
                if let Some(body) = body {
                    req.body(serde_json::to_string(&body)?)
                        .header("Content-Type", "application/json")
                } else {
                    req
                }
            },
            _ => return Err(HttpError::UnsupportedMethod),
        };
        let req = if query.is_empty() { req } else { req.query(query) };

        let resp = req.send().await?;
        debug!(
            url:% = url.path(),
            status = resp.status().as_u16(),
            latency_ms = start.elapsed().as_millis() as u64;
            "Upstream request completed"
        );

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".into());
            return Err(HttpError::ServerError { status, body });
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_sends_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let response: Value = client
            .send_request(Method::GET, "latest", &[("base", "USD".to_string())], None)
            .await
            .unwrap();
        assert_eq!(response["ok"], true);
    }

    #[tokio::test]
    async fn test_non_success_status_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let client = HttpClient::with_config(Url::parse(&server.uri()).unwrap(), 0, Duration::from_secs(5)).unwrap();
        let err = client
            .send_request::<Value>(Method::GET, "nothing", &[], None)
            .await
            .unwrap_err();
        match err {
            HttpError::ServerError { status, body } => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(body, "missing");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let client = HttpClient::new(Url::parse("http://localhost:1").unwrap()).unwrap();
        let err = client
            .send_request::<Value>(Method::DELETE, "x", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::UnsupportedMethod));
    }
}
