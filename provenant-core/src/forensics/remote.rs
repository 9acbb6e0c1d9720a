//! Remote forensics API client.
//!
//! Ships a base64 media payload to a hosted forensics service and maps the
//! response into an [`AuthenticityOpinion`]. Transient failures are retried
//! with exponential backoff; permanent failures surface as analysis errors
//! and are expected to resolve through the caller's neutral fallback.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use backoff::{future::retry_notify, ExponentialBackoff};
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{AnalyzerSource, AuthenticityAnalyzer, AuthenticityOpinion};
use crate::error::{ProvenantError, Result};
use crate::record::MediaType;

/// Largest payload shipped to the remote API. Bigger media resolves
/// through the neutral fallback instead of an oversized upload.
pub const MAX_REMOTE_PAYLOAD: usize = 4 * 1024 * 1024;

/// Configuration for the remote forensics analyzer.
#[derive(Clone)]
pub struct RemoteAnalyzerConfig {
    /// API base URL
    pub api_url: String,
    /// API key for authentication
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retry attempts
    pub max_retries: u32,
}

impl std::fmt::Debug for RemoteAnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAnalyzerConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl RemoteAnalyzerConfig {
    /// Create configuration from environment variables.
    ///
    /// Required: `FORENSICS_API_KEY`
    /// Optional: `FORENSICS_API_URL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FORENSICS_API_KEY").map_err(|_| {
            ProvenantError::Analysis("FORENSICS_API_KEY environment variable not set".into())
        })?;

        let api_url = std::env::var("FORENSICS_API_URL")
            .unwrap_or_else(|_| "https://api.provenant.dev/forensics/v1".to_string());

        Ok(Self {
            api_url,
            api_key,
            timeout: Duration::from_secs(10),
            max_retries: 3,
        })
    }
}

/// Remote forensics client.
pub struct RemoteAnalyzer {
    client: Client,
    config: RemoteAnalyzerConfig,
}

/// Analysis request body.
#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    /// Base64-encoded media payload
    media: &'a str,
    media_type: String,
}

/// Analysis response body.
#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    authenticity_score: f64,
    #[serde(default)]
    detected_anomalies: Vec<String>,
    #[serde(default)]
    conclusion: String,
}

impl RemoteAnalyzer {
    /// Create a new remote forensics client.
    #[instrument(level = "debug", skip_all, fields(api_url = %config.api_url))]
    pub fn new(config: RemoteAnalyzerConfig) -> Result<Self> {
        debug!("Creating remote forensics client");

        let client = Client::builder()
            .timeout(config.timeout)
            .https_only(true)
            .build()
            .map_err(|e| ProvenantError::Analysis(format!("Failed to create HTTP client: {e}")))?;

        info!("Remote forensics client created");
        Ok(Self { client, config })
    }

    /// Run one analysis attempt.
    async fn analyze_once(
        &self,
        payload: &str,
        media_type: MediaType,
    ) -> std::result::Result<AuthenticityOpinion, backoff::Error<ProvenantError>> {
        let url = format!("{}/analyze", self.config.api_url);
        let start = Instant::now();

        let request = AnalysisRequest {
            media: payload,
            media_type: media_type.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let latency_ms = start.elapsed().as_millis();
                warn!(error = %e, latency_ms = latency_ms as u64, "Analysis request failed");
                if is_transient_error(&e) {
                    backoff::Error::transient(ProvenantError::Analysis(format!(
                        "Transient error (will retry): {e}"
                    )))
                } else {
                    backoff::Error::permanent(ProvenantError::Analysis(format!(
                        "Analysis request failed: {e}"
                    )))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let err = ProvenantError::Analysis(format!("Analysis returned status: {status}"));
            return if is_transient_status(status) {
                Err(backoff::Error::transient(err))
            } else {
                Err(backoff::Error::permanent(err))
            };
        }

        let parsed: AnalysisResponse = response.json().await.map_err(|e| {
            backoff::Error::permanent(ProvenantError::Analysis(format!(
                "Failed to parse analysis response: {e}"
            )))
        })?;

        let latency_ms = start.elapsed().as_millis();
        debug!(
            latency_ms = latency_ms as u64,
            score = parsed.authenticity_score,
            "Analysis completed"
        );

        Ok(AuthenticityOpinion::new(
            parsed.authenticity_score,
            parsed.detected_anomalies,
            parsed.conclusion,
            AnalyzerSource::RemoteForensics,
        ))
    }
}

#[async_trait]
impl AuthenticityAnalyzer for RemoteAnalyzer {
    #[instrument(
        level = "info",
        skip(self, content),
        fields(bytes = content.len(), media_type = %media_type, max_retries = self.config.max_retries)
    )]
    async fn assess(&self, content: &[u8], media_type: MediaType) -> Result<AuthenticityOpinion> {
        if content.len() > MAX_REMOTE_PAYLOAD {
            return Err(ProvenantError::Analysis(format!(
                "Payload of {} bytes exceeds the {MAX_REMOTE_PAYLOAD}-byte remote limit",
                content.len()
            )));
        }

        let payload = base64::engine::general_purpose::STANDARD.encode(content);
        let start = Instant::now();

        let backoff = ExponentialBackoff {
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(2),
            max_elapsed_time: Some(self.config.timeout * self.config.max_retries),
            ..Default::default()
        };

        let result = retry_notify(
            backoff,
            || async { self.analyze_once(&payload, media_type).await },
            |err: ProvenantError, duration: Duration| {
                warn!(
                    error = %err,
                    retry_after_ms = duration.as_millis() as u64,
                    "Retry scheduled"
                );
            },
        )
        .await;

        let total_ms = start.elapsed().as_millis();
        match &result {
            Ok(opinion) => info!(
                total_latency_ms = total_ms as u64,
                score = opinion.score,
                "Remote analysis succeeded"
            ),
            Err(e) => {
                warn!(error = %e, total_latency_ms = total_ms as u64, "Remote analysis failed after all retries")
            }
        }

        result
    }

    fn source_id(&self) -> AnalyzerSource {
        AnalyzerSource::RemoteForensics
    }
}

/// Check if a reqwest error is transient and should be retried.
fn is_transient_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

/// Check if an HTTP status code indicates a transient error.
fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
            | StatusCode::BAD_GATEWAY
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RemoteAnalyzerConfig {
        RemoteAnalyzerConfig {
            api_url: "https://forensics.test".into(),
            api_key: "secret".into(),
            timeout: Duration::from_secs(1),
            max_retries: 1,
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", test_config());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_transient_status_codes() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_transient_status(StatusCode::GATEWAY_TIMEOUT));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
        assert!(!is_transient_status(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_oversize_payload_is_rejected_before_upload() {
        let analyzer = RemoteAnalyzer::new(test_config()).unwrap();
        let oversized = vec![0u8; MAX_REMOTE_PAYLOAD + 1];

        let err = analyzer
            .assess(&oversized, MediaType::Video)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("remote limit"));
    }
}
