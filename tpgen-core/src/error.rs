use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TpgError {
    /// The provider rejected the call with a rate limit, optionally
    /// advising how long to wait before retrying.
    #[error("rate limited by provider{}", retry_after_suffix(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    /// Any other endpoint-side failure (auth, malformed request, server fault).
    #[error("provider error: {0}")]
    Provider(String),

    /// Non-provider failure, e.g. the network layer gave up before the
    /// request reached the endpoint.
    #[error("unexpected error: {0}")]
    Unexpected(String),

    /// Terminal state: the retry budget for an operation is spent.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<TpgError>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TpgError>;

fn retry_after_suffix(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(" (retry after {}s)", wait.as_secs()),
        None => String::new(),
    }
}

impl TpgError {
    /// Server-advised wait time, when the provider supplied one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            TpgError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, TpgError::RateLimited { .. })
    }
}
