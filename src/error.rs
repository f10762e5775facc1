use thiserror::Error;

/// Everything that can go wrong while serving one assistant request.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Missing or malformed configuration, detected at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The post URL could not be retrieved (transport failure or non-2xx status).
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The fetched page produced no usable text.
    #[error("could not extract content: {0}")]
    Extraction(String),

    /// The completion API failed: network, auth, rate limit or provider error.
    #[error("completion request failed: {0}")]
    Upstream(String),

    /// The moderation reply did not carry the expected verdict label.
    #[error("could not parse moderation verdict: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
