use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Fetch error: {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Notifier error: {channel}: {message}")]
    Notifier { channel: String, message: String },

    #[error("No GPUs selected. Enable at least one GPU in your .env file.")]
    NoGpuSelected,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn notifier(channel: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Notifier {
            channel: channel.into(),
            message: message.into(),
        }
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
