//! Scripted test double for the [`ChatModel`] boundary.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tpgen_core::{ChatModel, ChatReply, ChatRequest, Result, TpgError};

/// A [`ChatModel`] that replays a scripted sequence of replies and errors
/// and records every request it receives, so tests can assert both on the
/// outputs and on how many (or that zero) calls were made.
pub struct ScriptedModel {
    name: String,
    script: Mutex<VecDeque<Result<ChatReply>>>,
    default_reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            default_reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(ChatReply::new(text)));
        self
    }

    #[must_use]
    pub fn with_error(self, error: TpgError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Reply to use once the script runs out; without one an exhausted
    /// script is an `Unexpected` error.
    #[must_use]
    pub fn with_default_reply(mut self, text: impl Into<String>) -> Self {
        self.default_reply = Some(text.into());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(request);

        if let Some(outcome) = self.script.lock().unwrap().pop_front() {
            return outcome;
        }
        match &self.default_reply {
            Some(text) => Ok(ChatReply::new(text.clone())),
            None => Err(TpgError::Unexpected("scripted model ran out of replies".to_string())),
        }
    }
}
