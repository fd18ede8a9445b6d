//! # tpgen-model
//!
//! Provider integration for the tpgen test-plan generation engine.
//!
//! - [`OpenAiClient`] - chat-completions client (one request per call,
//!   failures classified for the retry controller)
//! - [`retry`] - the shared bounded-retry/backoff controller
//! - [`ScriptedModel`] - scripted test double for dispatcher tests

pub mod mock;
pub mod openai;
pub mod retry;

pub use mock::ScriptedModel;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use retry::{RetryConfig, backoff_delay, execute_with_retry};
