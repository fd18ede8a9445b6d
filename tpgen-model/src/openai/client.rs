//! OpenAI chat-completions client.
//!
//! Single-attempt boundary: exactly one outbound request per `complete`
//! call, with failures classified for the retry controller. Retry policy
//! lives in [`crate::retry`], never here.

use super::config::{OPENAI_API_BASE, OpenAiConfig};
use super::convert;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tpgen_core::{ChatModel, ChatReply, ChatRequest, Result, TpgError};

pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| TpgError::Unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(OPENAI_API_BASE);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
        let wire_request = convert::to_wire_request(&request);

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| TpgError::Unexpected(format!("request transport failed: {e}")))?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = parse_retry_after(response.headers());
            return Err(TpgError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TpgError::Provider(format!("OpenAI API error ({status}): {body}")));
        }

        let parsed: convert::ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| TpgError::Provider(format!("malformed completion response: {e}")))?;

        convert::from_response(parsed)
    }
}

/// Parse the `retry-after` header as integer seconds.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
