use thiserror::Error;

/// Failures surfaced by the plugin commands and the chat client.
#[derive(Debug, Error)]
pub enum PluginError {
    /// `traits` is not valid JSON. Unlike `interests`, a bad value here
    /// aborts the command.
    #[error("invalid personality traits: {0}")]
    InvalidTraits(#[source] serde_json::Error),

    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat server answered with status {0}")]
    Status(u16),

    #[error("request worker is no longer running")]
    EngineStopped,
}
