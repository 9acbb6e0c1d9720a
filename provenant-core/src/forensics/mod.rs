//! External media-forensics opinion providers.
//!
//! The decision engine treats the authenticity opinion as an opaque
//! [0, 100] score; where it comes from is a capability injected at the
//! call site. An unreachable provider never fails verification: callers
//! substitute the neutral fallback opinion and resolve on ledger and
//! fingerprint evidence alone.

mod mock;
#[cfg(feature = "network")]
mod remote;

pub use mock::MockAnalyzer;
#[cfg(feature = "network")]
pub use remote::{RemoteAnalyzer, RemoteAnalyzerConfig, MAX_REMOTE_PAYLOAD};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::MediaType;

/// Neutral score substituted when no analyzer opinion can be obtained.
pub const FALLBACK_AUTHENTICITY_SCORE: f64 = 50.0;

/// Identifies which analyzer produced an opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalyzerSource {
    /// Remote forensics API.
    RemoteForensics,
    /// Deterministic mock (testing and offline operation).
    Mock,
    /// No analyzer opinion available; neutral fallback substituted.
    Fallback,
}

impl std::fmt::Display for AnalyzerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteForensics => write!(f, "Remote Forensics"),
            Self::Mock => write!(f, "Mock (deterministic)"),
            Self::Fallback => write!(f, "Fallback (no analyzer)"),
        }
    }
}

/// An authenticity opinion for one piece of media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticityOpinion {
    /// 0 (certainly fabricated) to 100 (certainly authentic).
    pub score: f64,
    /// Specific visual or acoustic issues the analyzer flagged.
    pub anomalies: Vec<String>,
    /// Free-text summary of the assessment.
    pub conclusion: String,
    pub source: AnalyzerSource,
}

impl AuthenticityOpinion {
    /// Build an opinion, clamping the score into [0, 100].
    pub fn new(
        score: f64,
        anomalies: Vec<String>,
        conclusion: impl Into<String>,
        source: AnalyzerSource,
    ) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            anomalies,
            conclusion: conclusion.into(),
            source,
        }
    }

    /// Neutral opinion used when assessment fails.
    pub fn fallback(reason: impl std::fmt::Display) -> Self {
        Self {
            score: FALLBACK_AUTHENTICITY_SCORE,
            anomalies: vec![format!("Forensic analysis unavailable: {reason}")],
            conclusion:
                "Forensic analysis unavailable; relying on ledger and fingerprint evidence."
                    .to_string(),
            source: AnalyzerSource::Fallback,
        }
    }
}

/// Trait for media-forensics opinion providers.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait AuthenticityAnalyzer: Send + Sync {
    /// Assess the authenticity of raw media bytes.
    ///
    /// This method may perform network requests; implementations should
    /// handle retries internally.
    async fn assess(&self, content: &[u8], media_type: MediaType) -> Result<AuthenticityOpinion>;

    /// Returns the source identifier recorded in the opinion.
    fn source_id(&self) -> AnalyzerSource;
}

/// Configuration for creating analyzers.
#[derive(Debug, Clone, Default)]
pub enum AnalyzerConfig {
    /// Remote forensics API.
    #[cfg(feature = "network")]
    Remote(RemoteAnalyzerConfig),

    /// Deterministic mock with a fixed score.
    Mock { score: f64 },

    /// Auto-select: remote when credentials are configured, mock otherwise.
    #[default]
    Auto,
}

/// Factory for creating analyzers.
pub struct AnalyzerFactory;

impl AnalyzerFactory {
    /// Create an analyzer from configuration.
    pub fn create(config: AnalyzerConfig) -> Result<Arc<dyn AuthenticityAnalyzer>> {
        match config {
            #[cfg(feature = "network")]
            AnalyzerConfig::Remote(remote_config) => {
                let analyzer = RemoteAnalyzer::new(remote_config)?;
                Ok(Arc::new(analyzer))
            }
            AnalyzerConfig::Mock { score } => Ok(Arc::new(MockAnalyzer::new(score))),
            AnalyzerConfig::Auto => Self::create_auto(),
        }
    }

    /// Auto-select the best available analyzer.
    fn create_auto() -> Result<Arc<dyn AuthenticityAnalyzer>> {
        #[cfg(feature = "network")]
        if let Ok(remote_config) = RemoteAnalyzerConfig::from_env() {
            tracing::info!("Auto-selected remote forensics analyzer");
            return Self::create(AnalyzerConfig::Remote(remote_config));
        }

        tracing::info!("Auto-selected mock forensics analyzer");
        Ok(Arc::new(MockAnalyzer::default()))
    }

    /// Create a mock analyzer for testing.
    pub fn create_mock() -> Arc<dyn AuthenticityAnalyzer> {
        Arc::new(MockAnalyzer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opinion_score_is_clamped() {
        let high = AuthenticityOpinion::new(140.0, vec![], "x", AnalyzerSource::Mock);
        let low = AuthenticityOpinion::new(-3.0, vec![], "x", AnalyzerSource::Mock);
        assert_eq!(high.score, 100.0);
        assert_eq!(low.score, 0.0);
    }

    #[test]
    fn test_fallback_opinion_is_neutral() {
        let opinion = AuthenticityOpinion::fallback("connection refused");
        assert_eq!(opinion.score, FALLBACK_AUTHENTICITY_SCORE);
        assert_eq!(opinion.source, AnalyzerSource::Fallback);
        assert!(opinion.anomalies[0].contains("connection refused"));
    }

    #[test]
    fn test_analyzer_config_default_is_auto() {
        assert!(matches!(AnalyzerConfig::default(), AnalyzerConfig::Auto));
    }

    #[test]
    fn test_create_mock_analyzer() {
        let analyzer = AnalyzerFactory::create_mock();
        assert_eq!(analyzer.source_id(), AnalyzerSource::Mock);
    }

    #[tokio::test]
    async fn test_mock_analyzer_via_factory_config() {
        let analyzer = AnalyzerFactory::create(AnalyzerConfig::Mock { score: 75.0 }).unwrap();
        let opinion = analyzer
            .assess(b"bytes", MediaType::Image)
            .await
            .unwrap();
        assert_eq!(opinion.score, 75.0);
    }
}
