//! Wire types and conversions for the chat-completions endpoint.

use serde::{Deserialize, Serialize};
use tpgen_core::{ChatReply, ChatRequest, Result, Role, TokenUsage, TpgError};

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

pub fn to_wire_request(request: &ChatRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: request.model.clone(),
        messages: request
            .messages
            .iter()
            .map(|m| WireMessage { role: role_name(m.role), content: m.content.clone() })
            .collect(),
        max_tokens: request.config.max_tokens,
        temperature: request.config.temperature,
    }
}

pub fn from_response(response: ChatCompletionResponse) -> Result<ChatReply> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TpgError::Provider("completion response contained no choices".to_string()))?;

    Ok(ChatReply {
        text: choice.message.content.unwrap_or_default(),
        usage: response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
    })
}
