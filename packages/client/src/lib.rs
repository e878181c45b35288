#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Thin HTTP client for the Sylithe backends.
//!
//! Two backends are involved: the analysis service (LULC, baselines, change
//! detection, risk, leakage, DACB) and a separate canopy-height service.
//! Each is reached through a trait ([`AnalysisApi`], [`ChmApi`]) so the
//! workflow layer can be exercised against in-memory implementations.
//!
//! Every call is a single attempt: no timeout, retry or backoff. Any
//! non-2xx status from the analysis service becomes
//! [`ClientError::Status`] without looking at the response body.

pub mod analysis;
pub mod chm;
pub mod config;
pub mod requests;

use reqwest::StatusCode;
use sylithe_analysis_models::{
    AreaOfInterest, Baseline, ChangeResult, ChmResult, DacbResult, LeakageResult, LockReceipt,
    LulcResult, RiskResult, Timeline,
};
use thiserror::Error;

pub use analysis::HttpAnalysisClient;
pub use chm::HttpChmClient;
pub use config::ClientConfig;

/// Errors from a backend call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with a non-2xx status.
    #[error("API error: {status_text}")]
    Status {
        /// Numeric HTTP status.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The canopy-height backend reported a failure.
    #[error("{message}")]
    Chm {
        /// Message from the backend, or a generic fallback.
        message: String,
    },
}

/// Converts a non-success status into [`ClientError::Status`].
///
/// # Errors
///
/// Returns [`ClientError::Status`] for any status outside 200-299.
pub fn ensure_success(status: StatusCode) -> Result<(), ClientError> {
    if status.is_success() {
        return Ok(());
    }

    Err(ClientError::Status {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    })
}

/// The analysis backend, one method per endpoint.
#[async_trait::async_trait]
pub trait AnalysisApi: Send + Sync {
    /// `POST /api/lulc/analyze`: single-period classification.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn analyze_lulc(
        &self,
        aoi: &AreaOfInterest,
        start_date: &str,
        end_date: &str,
    ) -> Result<LulcResult, ClientError>;

    /// `POST /api/lulc/timeline`: one classification per year.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn analyze_timeline(
        &self,
        aoi: &AreaOfInterest,
        start_year: i32,
        end_year: i32,
    ) -> Result<Timeline, ClientError>;

    /// `POST /api/baseline/create`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn create_baseline(
        &self,
        aoi: &AreaOfInterest,
        baseline_year: i32,
    ) -> Result<Baseline, ClientError>;

    /// `POST /api/baseline/lock`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn lock_baseline(
        &self,
        baseline_id: &str,
        locked_by: &str,
    ) -> Result<LockReceipt, ClientError>;

    /// `GET /api/baseline/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn get_baseline(&self, baseline_id: &str) -> Result<Baseline, ClientError>;

    /// `POST /api/change-detection`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn detect_changes(
        &self,
        baseline_id: &str,
        current_year: i32,
        aoi: &AreaOfInterest,
    ) -> Result<ChangeResult, ClientError>;

    /// `POST /api/risk-assessment`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn assess_risk(
        &self,
        baseline_id: &str,
        current_year: i32,
        aoi: &AreaOfInterest,
    ) -> Result<RiskResult, ClientError>;

    /// `POST /api/leakage-analysis`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn analyze_leakage(
        &self,
        baseline_id: &str,
        current_year: i32,
        aoi: &AreaOfInterest,
    ) -> Result<LeakageResult, ClientError>;

    /// `POST /api/dacb/analyze`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    async fn analyze_dacb(
        &self,
        aoi: &AreaOfInterest,
        baseline_year: i32,
        current_year: i32,
        buffer_km: f64,
        use_knn: bool,
    ) -> Result<DacbResult, ClientError>;
}

/// The canopy-height backend.
#[async_trait::async_trait]
pub trait ChmApi: Send + Sync {
    /// `POST {chm}/chm/predict`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Chm`] carrying the backend's message when it
    /// reports an error, or a transport/JSON error.
    async fn predict(&self, aoi: &AreaOfInterest, year: i32) -> Result<ChmResult, ClientError>;
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP stub used to exercise the real clients without a
    //! backend.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// What the stub received.
    pub struct Captured {
        pub request_line: String,
        pub body: String,
    }

    /// Serves exactly one request with the given status line and JSON body.
    /// Returns the base URL and a receiver for the captured request.
    pub async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);

            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let _ = tx.send(Captured {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
            });
        });

        (format!("http://{addr}"), rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_pass() {
        assert!(ensure_success(StatusCode::OK).is_ok());
        assert!(ensure_success(StatusCode::CREATED).is_ok());
    }

    #[test]
    fn client_and_server_errors_read_the_same() {
        let not_found = ensure_success(StatusCode::NOT_FOUND).unwrap_err();
        assert_eq!(not_found.to_string(), "API error: Not Found");

        let server = ensure_success(StatusCode::INTERNAL_SERVER_ERROR).unwrap_err();
        assert_eq!(server.to_string(), "API error: Internal Server Error");
        assert!(matches!(server, ClientError::Status { status: 500, .. }));
    }
}
