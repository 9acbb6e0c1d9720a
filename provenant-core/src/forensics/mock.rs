//! Mock analyzer for testing and offline operation.

use async_trait::async_trait;

use super::{AnalyzerSource, AuthenticityAnalyzer, AuthenticityOpinion};
use crate::error::Result;
use crate::record::MediaType;

/// Deterministic analyzer that always answers with a fixed score.
/// WARNING: performs no analysis at all - testing and demos only.
pub struct MockAnalyzer {
    score: f64,
}

impl MockAnalyzer {
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
        }
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new(88.0)
    }
}

#[async_trait]
impl AuthenticityAnalyzer for MockAnalyzer {
    async fn assess(&self, content: &[u8], media_type: MediaType) -> Result<AuthenticityOpinion> {
        Ok(AuthenticityOpinion::new(
            self.score,
            Vec::new(),
            format!(
                "Mock assessment of {} bytes of {media_type} content; no real analysis performed.",
                content.len()
            ),
            AnalyzerSource::Mock,
        ))
    }

    fn source_id(&self) -> AnalyzerSource {
        AnalyzerSource::Mock
    }
}
