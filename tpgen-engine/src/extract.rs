//! Feature/criticality extraction, run once per generation pass.

use std::sync::Arc;
use tpgen_core::{ChatModel, Feature, parse_features};
use tpgen_model::{RetryConfig, execute_with_retry};

use crate::prompt;

/// Extracts the feature list that seeds every feature-dependent section.
///
/// Extraction failures never abort a run: an exhausted budget degrades to
/// an empty list and feature-dependent sections render placeholders.
pub struct FeatureExtractor {
    retry: RetryConfig,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self { retry: RetryConfig::default() }
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn extract(&self, model: &Arc<dyn ChatModel>, corpus: &str) -> Vec<Feature> {
        let request = prompt::extract_features(corpus).into_request(model.name());

        let outcome = execute_with_retry(&self.retry, || {
            let model = Arc::clone(model);
            let request = request.clone();
            async move { model.complete(request).await }
        })
        .await;

        match outcome {
            Ok(reply) => {
                let text = reply.text.trim();
                if text.is_empty() {
                    tracing::warn!("feature extraction returned an empty reply");
                    return Vec::new();
                }
                let features = parse_features(text);
                tracing::debug!(count = features.len(), "extracted features");
                features
            }
            Err(error) => {
                tracing::warn!(error = %error, "feature extraction failed; continuing without features");
                Vec::new()
            }
        }
    }
}
