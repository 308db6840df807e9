/// Failures raised inside the dispatcher. Apart from client construction,
/// these are caught at the dispatch boundary and never reach a tool caller.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON in response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Startup failures surfaced to `main`.
#[derive(Debug, thiserror::Error)]
pub enum McpGithubError {
    #[error("Failed to create GitHub client: {0}")]
    Client(#[from] DispatchError),
}
