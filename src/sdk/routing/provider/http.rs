//! HTTP transport seam, so providers can be exercised against canned bodies.

use crate::sdk::routing::error::HttpError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

pub trait HttpClient: Send + Sync {
    /// GETs `url` and returns the body of a 2xx response.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, HttpError>> + Send;
}

#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| HttpError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            log::error!("[HTTP] GET {} failed: {}", url, e);
            HttpError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("[HTTP] GET {} returned {}", url, status);
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(HttpError::from)?;
        Ok(body.to_vec())
    }
}
