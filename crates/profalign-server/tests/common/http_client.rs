//! HTTP client helpers for tests.

use std::time::Duration;

use profalign_server::gateway::PROFALIGN_STATUS_HEADER;
use profalign_server::gateway::payload::{
    EvaluateResponse, HealthResponse, LoadModelResponse, UnloadModelResponse,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn expect_ok<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, TestClientError> {
        match resp.status().as_u16() {
            200 => Ok(resp.json().await?),
            400 | 422 => {
                let kind = resp
                    .headers()
                    .get(PROFALIGN_STATUS_HEADER)
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string();
                let body: serde_json::Value = resp.json().await?;
                let detail = body["detail"].as_str().unwrap_or_default().to_string();
                Err(TestClientError::BadRequest { kind, detail })
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn root(&self) -> Result<serde_json::Value, TestClientError> {
        let resp = self.client.get(self.url("/")).send().await?;
        Self::expect_ok(resp).await
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Self::expect_ok(resp).await
    }

    pub async fn models(&self) -> Result<serde_json::Value, TestClientError> {
        let resp = self.client.get(self.url("/models")).send().await?;
        Self::expect_ok(resp).await
    }

    pub async fn load_model(&self, model_id: &str) -> Result<LoadModelResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url("/load_model"))
            .json(&serde_json::json!({ "model_id": model_id }))
            .send()
            .await?;
        Self::expect_ok(resp).await
    }

    pub async fn unload_model(&self) -> Result<UnloadModelResponse, TestClientError> {
        let resp = self.client.post(self.url("/unload_model")).send().await?;
        Self::expect_ok(resp).await
    }

    pub async fn evaluate_batch(
        &self,
        body: &serde_json::Value,
    ) -> Result<EvaluateResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url("/evaluate_batch"))
            .json(body)
            .send()
            .await?;
        Self::expect_ok(resp).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request ({kind}): {detail}")]
    BadRequest { kind: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url_building() {
        let client = TestClient::new("http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
        assert_eq!(client.url("health"), "http://localhost:8000/health");
    }
}
