use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{AnalysisRequest, AnalysisResponse, BatchRequest, BatchResponse};

/// HTTP client for the external analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for the configured service, or `None` when no base URL is set.
    pub fn from_config(cfg: &Config) -> Result<Option<Self>> {
        cfg.api_url
            .as_deref()
            .map(|url| Self::new(url, cfg.request_timeout_secs.map(Duration::from_secs)))
            .transpose()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /analyze` for a single ticker.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        self.post("analyze", request).await
    }

    /// `POST /analyze_batch`; results come back in request order.
    pub async fn analyze_batch(&self, requests: &[AnalysisRequest]) -> Result<BatchResponse> {
        let body = BatchRequest { tickers: requests.to_vec() };
        self.post("analyze_batch", &body).await
    }

    /// One ticker goes to `/analyze`, several to `/analyze_batch`. Results
    /// line up with `requests`; a batch of the wrong length is an error.
    pub async fn analyze_many(&self, requests: &[AnalysisRequest]) -> Result<Vec<AnalysisResponse>> {
        if let [single] = requests {
            return Ok(vec![self.analyze(single).await?]);
        }

        let results = self.analyze_batch(requests).await?.results;
        if results.len() != requests.len() {
            warn!(
                "analyze_batch returned {} results for {} tickers",
                results.len(),
                requests.len()
            );
            return Err(AppError::BatchMismatch { expected: requests.len(), got: results.len() });
        }
        Ok(results)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        debug!("POST {url}");

        let resp = self.http.post(&url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("POST {url} returned {status}");
            return Err(AppError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            let preview = String::from_utf8_lossy(&bytes[..bytes.len().min(200)]).into_owned();
            warn!("POST {url} returned an unexpected body: {e} | {preview}");
            AppError::Json(e)
        })
    }
}
