use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::errors::ClientError;
use crate::client::source::StatusSource;
use crate::client::types::{
    CarTypesResponse, ForceUpdateResponse, ModelsResponse, ResetResponse, StuckCheckResponse,
};
use crate::config::ServerConfig;
use crate::jobs::{JobKind, StatusEndpoint, StatusResponse};

/// HTTP client for the car-price web application's JSON API.
///
/// All endpoints are unauthenticated GETs relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl { url: base_url });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ClientError::BuildFailed {
            message: e.to_string(),
        })?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!(event = "core.client.request_started", path = path);

        let response = self
            .http
            .get(self.url_for(path))
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                event = "core.client.http_status",
                path = path,
                status = status.as_u16()
            );
            return Err(ClientError::HttpStatus {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ClientError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub async fn check_stuck_crawlers(&self) -> Result<StuckCheckResponse, ClientError> {
        self.get_json("/api/check-stuck-crawlers").await
    }

    pub async fn reset_job(&self, kind: JobKind, job_id: &str) -> Result<ResetResponse, ClientError> {
        let path = match kind {
            JobKind::Crawl => format!("/api/reset-crawler/{}", job_id),
            JobKind::Processing => format!("/api/reset-processing/{}", job_id),
        };
        self.get_json(&path).await
    }

    pub async fn force_update_records(
        &self,
        job_id: &str,
    ) -> Result<ForceUpdateResponse, ClientError> {
        self.get_json(&format!("/api/force-update-records/{}", job_id))
            .await
    }

    pub async fn get_models(&self, brand_id: &str) -> Result<ModelsResponse, ClientError> {
        self.get_json(&format!("/api/get-models/{}", brand_id)).await
    }

    pub async fn get_car_types(&self, model_id: &str) -> Result<CarTypesResponse, ClientError> {
        self.get_json(&format!("/api/get-car-types/{}", model_id))
            .await
    }
}

impl StatusSource for ApiClient {
    async fn fetch_status(&self, endpoint: &StatusEndpoint) -> Result<StatusResponse, ClientError> {
        self.get_json(&endpoint.path()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let config = ServerConfig {
            base_url: Some("http://localhost:5000/".to_string()),
            request_timeout_secs: Some(5),
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.url_for("/api/crawl-status/42"),
            "http://localhost:5000/api/crawl-status/42"
        );
    }

    #[test]
    fn test_rejects_scheme_less_base_url() {
        let config = ServerConfig {
            base_url: Some("localhost:5000".to_string()),
            request_timeout_secs: None,
        };
        let err = ApiClient::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }
}
