use std::time::Duration;

use crate::dispatch::Intent;

pub const DEFAULT_API_BASE: &str = "https://api.github.com/";
pub const DEFAULT_USER_AGENT: &str = "mcp-github-admin";
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process-wide gateway settings. Built once at startup and shared read-only
/// by every tool call.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            read_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            write_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Join a relative API path onto the base address. No escaping is done;
    /// identifiers are substituted as given.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn timeout_for(&self, intent: Intent) -> Duration {
        match intent {
            Intent::Read => self.read_timeout,
            Intent::Create | Intent::Update | Intent::Delete | Intent::DeleteContent => {
                self.write_timeout
            }
        }
    }

    /// Value for the `Authorization` header. A missing token still yields a
    /// header and is left for GitHub to reject.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_with_single_slash() {
        let config = GatewayConfig::default();
        assert_eq!(
            config.endpoint("users/octocat"),
            "https://api.github.com/users/octocat"
        );

        let config = GatewayConfig::default().with_api_base("http://127.0.0.1:9999");
        assert_eq!(
            config.endpoint("/user/repos"),
            "http://127.0.0.1:9999/user/repos"
        );
    }

    #[test]
    fn test_endpoint_does_not_escape_identifiers() {
        let config = GatewayConfig::default();
        assert_eq!(
            config.endpoint("repos/alice/demo/contents/docs/a b.md"),
            "https://api.github.com/repos/alice/demo/contents/docs/a b.md"
        );
    }

    #[test]
    fn test_timeout_for_splits_read_and_write() {
        let config = GatewayConfig::default()
            .with_read_timeout(Duration::from_secs(5))
            .with_write_timeout(Duration::from_secs(60));
        assert_eq!(config.timeout_for(Intent::Read), Duration::from_secs(5));
        for intent in [
            Intent::Create,
            Intent::Update,
            Intent::Delete,
            Intent::DeleteContent,
        ] {
            assert_eq!(config.timeout_for(intent), Duration::from_secs(60));
        }
    }

    #[test]
    fn test_default_timeouts_are_thirty_seconds() {
        let config = GatewayConfig::default();
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert_eq!(config.write_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_bearer_without_token_is_still_sent() {
        assert_eq!(GatewayConfig::default().bearer(), "Bearer ");
        let config = GatewayConfig::default().with_token(Some("ghp_abc".into()));
        assert_eq!(config.bearer(), "Bearer ghp_abc");
    }
}
