//! Named GitHub operations. Each one shapes a URL and payload, then hands
//! off to the [`Dispatcher`] and returns its [`Outcome`] untouched.

use base64::Engine;
use serde::Serialize;

use crate::dispatch::{Dispatcher, Intent, Outcome};

pub const DEFAULT_BRANCH: &str = "main";

/// Body for `POST /user/repos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRepoPayload {
    pub name: String,
    pub private: bool,
    pub description: String,
}

/// Commit envelope for the contents API. `content` is absent for deletes and
/// `sha` is absent for creates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentCommit {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub branch: String,
}

impl ContentCommit {
    pub fn create(message: &str, content: &str, branch: Option<&str>) -> Self {
        Self {
            message: message.to_string(),
            content: Some(encode_content(content)),
            sha: None,
            branch: branch.unwrap_or(DEFAULT_BRANCH).to_string(),
        }
    }

    pub fn update(message: &str, content: &str, sha: &str, branch: Option<&str>) -> Self {
        Self {
            sha: Some(sha.to_string()),
            ..Self::create(message, content, branch)
        }
    }

    pub fn delete(message: &str, sha: &str, branch: Option<&str>) -> Self {
        Self {
            message: message.to_string(),
            content: None,
            sha: Some(sha.to_string()),
            branch: branch.unwrap_or(DEFAULT_BRANCH).to_string(),
        }
    }
}

/// Standard padded base64 of the UTF-8 bytes, as the contents API expects.
pub fn encode_content(content: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(content.as_bytes())
}

/// Inverse of [`encode_content`]. GitHub wraps base64 at 60 columns, so
/// whitespace is stripped first.
pub fn decode_content(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD.decode(cleaned)
}

/// Add `decoded_content` (the file text) next to GitHub's base64 `content`.
/// Blobs that are not UTF-8 read as `[binary content]`. Directory listings
/// and failures pass through untouched.
pub fn with_decoded_content(outcome: Outcome) -> Outcome {
    match outcome {
        Outcome::Success(mut value) => {
            let decoded = value.get("content").and_then(|c| c.as_str()).map(|c| {
                decode_content(c)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
                    .unwrap_or_else(|| "[binary content]".to_string())
            });
            if let (Some(text), Some(fields)) = (decoded, value.as_object_mut()) {
                fields.insert(
                    "decoded_content".to_string(),
                    serde_json::Value::String(text),
                );
            }
            Outcome::Success(value)
        }
        other => other,
    }
}

fn contents_path(owner: &str, repo: &str, path: &str) -> String {
    format!("repos/{owner}/{repo}/contents/{path}")
}

#[derive(Clone)]
pub struct GithubOps {
    dispatcher: Dispatcher,
}

impl GithubOps {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    fn url(&self, path: &str) -> String {
        self.dispatcher.config().endpoint(path)
    }

    pub async fn git_info(&self, username: &str) -> Outcome {
        let url = self.url(&format!("users/{username}"));
        self.dispatcher.dispatch(&url, None::<&()>, Intent::Read).await
    }

    pub async fn create_repo(
        &self,
        name: &str,
        private: bool,
        description: Option<&str>,
    ) -> Outcome {
        let url = self.url("user/repos");
        let payload = CreateRepoPayload {
            name: name.to_string(),
            private,
            description: description.unwrap_or_default().to_string(),
        };
        self.dispatcher
            .dispatch(&url, Some(&payload), Intent::Create)
            .await
    }

    pub async fn delete_repo(&self, owner: &str, repo: &str) -> Outcome {
        let url = self.url(&format!("repos/{owner}/{repo}"));
        self.dispatcher
            .dispatch(&url, None::<&()>, Intent::Delete)
            .await
    }

    pub async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        commit_message: &str,
        branch: Option<&str>,
    ) -> Outcome {
        let url = self.url(&contents_path(owner, repo, path));
        let payload = ContentCommit::create(commit_message, content, branch);
        self.dispatcher
            .dispatch(&url, Some(&payload), Intent::Update)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        sha: &str,
        commit_message: &str,
        branch: Option<&str>,
    ) -> Outcome {
        let url = self.url(&contents_path(owner, repo, path));
        let payload = ContentCommit::update(commit_message, content, sha, branch);
        self.dispatcher
            .dispatch(&url, Some(&payload), Intent::Update)
            .await
    }

    pub async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        commit_message: &str,
        branch: Option<&str>,
    ) -> Outcome {
        let url = self.url(&contents_path(owner, repo, path));
        let payload = ContentCommit::delete(commit_message, sha, branch);
        self.dispatcher
            .dispatch(&url, Some(&payload), Intent::DeleteContent)
            .await
    }

    /// Fetch file metadata (including the blob `sha` needed by update and
    /// delete), optionally at a given ref.
    pub async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> Outcome {
        let mut route = contents_path(owner, repo, path);
        if let Some(git_ref) = git_ref {
            route.push_str(&format!("?ref={git_ref}"));
        }
        let url = self.url(&route);
        self.dispatcher.dispatch(&url, None::<&()>, Intent::Read).await
    }
}
