use thiserror::Error;

/// Failures while fetching or decoding the feed document.
///
/// All variants collapse to the same user-visible message; they are kept
/// apart so the log tells them apart.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport-level failure before a response body was read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered, but not with a 2xx status.
    #[error("feed request failed with HTTP {0}")]
    Status(reqwest::StatusCode),
    /// The response body was not a JSON document.
    #[error("malformed feed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures reported by the external embed provider.
///
/// None of these escalate past the player lifecycle manager; a playback
/// failure flips the affected handle into its terminal failed state.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("provider API failed to load: {0}")]
    ApiLoad(String),
    #[error("player creation failed: {0}")]
    Create(String),
    #[error("playback failed: {0}")]
    Playback(String),
}
