// src/core/client.rs

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::core::api::ScanApi;
use crate::core::error::ApiError;
use crate::core::models::{
    Analytics, ApiResult, FindingsPage, NewScan, Report, ReportRequest, Scan, ScanPage, ScanStatistics,
    TargetValidation, TargetValidationRequest,
};

const USER_AGENT: &str = concat!("DorkxMonitor/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of [`ScanApi`] on top of `reqwest`.
///
/// Request timeouts are enforced by the underlying client, so a stuck read
/// always settles into an `ApiError::Transport` instead of hanging its caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client for the backend rooted at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - The backend origin, e.g. `http://localhost:8000`.
    /// * `timeout` - Upper bound for every request, connect included.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        // Relative joins only keep the last path segment when it ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a report's (usually relative) download URL against the base URL.
    pub fn download_url(&self, report: &Report) -> Result<Url, ApiError> {
        Ok(self.base_url.join(&report.download_url)?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint: path.to_string(), source })?;
        decode(path, response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Response> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint: path.to_string(), source })?;
        ensure_success(path, response).await
    }
}

/// Turns a non-success response into `ApiError::Status`, keeping whatever
/// message the server put in the body.
async fn ensure_success(endpoint: &str, response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body);
    warn!(endpoint, status = status.as_u16(), message = message.as_deref().unwrap_or(""), "API call rejected.");
    Err(ApiError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> ApiResult<T> {
    let response = ensure_success(endpoint, response).await?;
    response
        .json::<T>()
        .await
        .map_err(|source| ApiError::Decode { endpoint: endpoint.to_string(), source })
}

/// Extracts `message` (our error envelope) or a string `detail` (framework
/// errors) from a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[async_trait]
impl ScanApi for ApiClient {
    async fn validate_target(&self, target: &str) -> ApiResult<TargetValidation> {
        let path = "api/v1/targets/validate";
        let response = self.post(path, &TargetValidationRequest { target }).await?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { endpoint: path.to_string(), source })
    }

    async fn create_scan(&self, request: &NewScan) -> ApiResult<Scan> {
        let path = "api/v1/scans";
        let response = self.post(path, request).await?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { endpoint: path.to_string(), source })
    }

    async fn get_scan(&self, scan_id: &str) -> ApiResult<Scan> {
        self.get_json(&format!("api/v1/scans/{scan_id}"), &[]).await
    }

    async fn get_scan_findings(&self, scan_id: &str) -> ApiResult<FindingsPage> {
        self.get_json(&format!("api/v1/scans/{scan_id}/findings"), &[]).await
    }

    async fn get_scan_statistics(&self, scan_id: &str) -> ApiResult<ScanStatistics> {
        let mut statistics: ScanStatistics = self
            .get_json(&format!("api/v1/scans/{scan_id}/statistics"), &[])
            .await?;
        if statistics.scan_id.is_empty() {
            statistics.scan_id = scan_id.to_string();
        }
        Ok(statistics)
    }

    async fn get_scan_reports(&self, scan_id: &str) -> ApiResult<Vec<Report>> {
        self.get_json(&format!("api/v1/scans/{scan_id}/reports"), &[]).await
    }

    async fn generate_report(&self, request: &ReportRequest) -> ApiResult<()> {
        let response = self.post("api/v1/reports", request).await?;
        debug!(
            scan_id = %request.scan_id,
            format = %request.report_type,
            created = response.status() == StatusCode::CREATED,
            "Report generation confirmed."
        );
        Ok(())
    }

    async fn list_scans(&self, page: u32, page_size: u32) -> ApiResult<ScanPage> {
        self.get_json(
            "api/v1/scans",
            &[("page", page.to_string()), ("page_size", page_size.to_string())],
        )
        .await
    }

    async fn get_analytics_overview(&self) -> ApiResult<Analytics> {
        self.get_json("api/v1/scans/analytics/overview", &[]).await
    }
}
