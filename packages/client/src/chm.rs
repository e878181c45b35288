//! `reqwest` implementation of [`ChmApi`].
//!
//! Unlike the analysis backend, the canopy-height service reports failures
//! as `{"status": "error", "message": ...}`, sometimes with a 2xx status,
//! so the body is inspected before it is decoded.

use reqwest::StatusCode;
use sylithe_analysis_models::{AreaOfInterest, ChmResult};

use crate::requests::ChmRequest;
use crate::{ChmApi, ClientConfig, ClientError};

const FALLBACK_MESSAGE: &str = "GEE Engine Error";

/// Canopy-height backend client.
pub struct HttpChmClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChmClient {
    /// Creates a client for the backend at `base_url`, which already
    /// includes any `/api` prefix.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.chm_api_url.clone())
    }
}

/// Interprets a canopy-height response.
///
/// # Errors
///
/// * [`ClientError::Chm`] when the status is not 2xx, the body carries
///   `"status": "error"`, or the body is `null`
/// * [`ClientError::Json`] when a 2xx body is not a prediction
pub fn decode_prediction(status: StatusCode, body: &str) -> Result<ChmResult, ClientError> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        if status.is_success() {
            return Ok(serde_json::from_str(body)?);
        }
        return Err(ClientError::Chm {
            message: FALLBACK_MESSAGE.to_string(),
        });
    };

    let reported_error = value.get("status").and_then(serde_json::Value::as_str) == Some("error");

    if !status.is_success() || reported_error || value.is_null() {
        let message = value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(FALLBACK_MESSAGE)
            .to_string();
        return Err(ClientError::Chm { message });
    }

    Ok(serde_json::from_value(value)?)
}

#[async_trait::async_trait]
impl ChmApi for HttpChmClient {
    async fn predict(&self, aoi: &AreaOfInterest, year: i32) -> Result<ChmResult, ClientError> {
        let url = format!("{}/chm/predict", self.base_url);
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .json(&ChmRequest { geojson: aoi, year })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        decode_prediction(status, &body).inspect_err(|e| {
            log::error!("Canopy height prediction failed: {e}");
        })
    }
}
