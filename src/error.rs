/// Errors from profile fetching and widget configuration.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("profile request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("profile API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("profile payload could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("auto-refresh needs a tokio runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}

