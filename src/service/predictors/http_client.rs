//! Pooled HTTP client for the genomic model API

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::service::{
    config::PredictionConfig,
    types::{ModelStats, ServiceError},
};

/// Header carrying the model API key
const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client with connection pooling and request accounting
#[derive(Debug)]
pub struct ModelHttpClient {
    client: Client,
    api_key: String,
    /// Total request counter
    request_count: AtomicU64,
    /// Failed request counter
    failure_count: AtomicU64,
}

impl ModelHttpClient {
    /// Create a new pooled HTTP client
    pub fn new(config: &PredictionConfig, api_key: &str) -> Result<Self, ServiceError> {
        let mut client_builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true);

        if let Some(idle_timeout) = config.pool_idle_timeout_seconds {
            client_builder = client_builder.pool_idle_timeout(Duration::from_secs(idle_timeout));
        }

        if let Some(keep_alive) = config.keep_alive_seconds {
            client_builder = client_builder.tcp_keepalive(Duration::from_secs(keep_alive));
        }

        let client = client_builder.build().map_err(|e| {
            ServiceError::ConfigError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            request_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        })
    }

    /// POST a JSON body and decode a JSON response. Non-2xx statuses are errors.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let result = self.send(url, body).await;
        if result.is_err() {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    async fn send<B, T>(&self, url: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::PredictionFailed(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.trim();
            return Err(ServiceError::PredictionFailed(if text.is_empty() {
                format!("Model API returned HTTP {}", status)
            } else {
                format!("Model API returned HTTP {}: {}", status, text)
            }));
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::PredictionFailed(format!("Failed to parse response: {}", e)))
    }

    /// Get request statistics
    pub fn get_stats(&self) -> ModelStats {
        ModelStats {
            total_requests: self.request_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
        }
    }
}
