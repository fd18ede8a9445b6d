//! OpenAI chat-completions provider.

pub mod client;
pub mod config;
pub mod convert;

pub use client::OpenAiClient;
pub use config::{DEFAULT_MODEL, OPENAI_API_BASE, OpenAiConfig};
