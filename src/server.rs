use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{schemars, tool, tool_handler, tool_router, ServerHandler};
use serde::Deserialize;

use crate::dispatch::Outcome;
use crate::ops::{self, GithubOps};

#[derive(Clone)]
pub struct McpGithubServer {
    ops: GithubOps,
    tool_router: ToolRouter<Self>,
}

// -- Tool parameter types --

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    #[schemars(description = "GitHub username to look up")]
    pub username: String,
}

fn default_private() -> bool {
    true
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRepoParams {
    #[schemars(description = "Name of the repository to create")]
    pub repo_name: String,

    #[schemars(description = "Whether the repository is private (default: true)")]
    #[serde(default = "default_private")]
    pub private: bool,

    #[schemars(description = "Optional description of the repository")]
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRepoParams {
    #[schemars(description = "User or organization that owns the repository")]
    pub username: String,

    #[schemars(description = "Name of the repository to delete")]
    pub repo_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateFileParams {
    #[schemars(description = "Repository owner's username")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "File path within the repository (e.g. folder/filename.txt)")]
    pub path: String,

    #[schemars(description = "File content as text; it is base64 encoded before upload")]
    pub content: String,

    #[schemars(description = "Commit message")]
    pub commit_message: String,

    #[schemars(description = "Branch to commit to (default: main)")]
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFileParams {
    #[schemars(description = "Repository owner's username")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "File path within the repository (e.g. folder/filename.txt)")]
    pub path: String,

    #[schemars(description = "New file content as text; it is base64 encoded before upload")]
    pub content: String,

    #[schemars(description = "Blob SHA of the file being replaced")]
    pub sha: String,

    #[schemars(description = "Commit message")]
    pub commit_message: String,

    #[schemars(description = "Branch to commit to (default: main)")]
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFileParams {
    #[schemars(description = "Repository owner's username")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "File path within the repository (e.g. folder/filename.txt)")]
    pub path: String,

    #[schemars(description = "Blob SHA of the file to delete")]
    pub sha: String,

    #[schemars(description = "Commit message")]
    pub commit_message: String,

    #[schemars(description = "Branch to commit to (default: main)")]
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFileParams {
    #[schemars(description = "Repository owner's username")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "File path within the repository")]
    pub path: String,

    #[schemars(description = "Git ref (branch, tag, or SHA). Defaults to the repo's default branch")]
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

impl McpGithubServer {
    pub fn new(ops: GithubOps) -> Self {
        Self {
            ops,
            tool_router: Self::tool_router(),
        }
    }
}

/// Render an outcome as the tool's text content. Soft failures become the
/// literal `null`.
fn outcome_result(outcome: Outcome) -> CallToolResult {
    tracing::debug!(success = outcome.is_success(), "Tool call finished");
    let text = serde_json::to_string_pretty(&outcome.into_value())
        .unwrap_or_else(|_| "null".to_string());
    CallToolResult::success(vec![Content::text(text)])
}

// -- MCP tool handlers (thin wrappers over GithubOps) --

#[tool_router]
impl McpGithubServer {
    #[tool(name = "git_info", description = "Get GitHub user info by username")]
    async fn git_info(
        &self,
        Parameters(params): Parameters<UserParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(outcome_result(self.ops.git_info(&params.username).await))
    }

    #[tool(
        name = "create_repo",
        description = "Create a new repository for the authenticated user"
    )]
    async fn create_repo(
        &self,
        Parameters(params): Parameters<CreateRepoParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .ops
            .create_repo(
                &params.repo_name,
                params.private,
                params.description.as_deref(),
            )
            .await;
        Ok(outcome_result(outcome))
    }

    #[tool(
        name = "delete_repo",
        description = "Delete a repository. Returns a success message or the GitHub error body"
    )]
    async fn delete_repo(
        &self,
        Parameters(params): Parameters<DeleteRepoParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .ops
            .delete_repo(&params.username, &params.repo_name)
            .await;
        Ok(outcome_result(outcome))
    }

    #[tool(
        name = "create_file",
        description = "Create a new file in a repository with a single commit"
    )]
    async fn create_file(
        &self,
        Parameters(params): Parameters<CreateFileParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .ops
            .create_file(
                &params.owner,
                &params.repo,
                &params.path,
                &params.content,
                &params.commit_message,
                params.branch.as_deref(),
            )
            .await;
        Ok(outcome_result(outcome))
    }

    #[tool(
        name = "update_file",
        description = "Replace the content of an existing file; requires the file's current blob SHA"
    )]
    async fn update_file(
        &self,
        Parameters(params): Parameters<UpdateFileParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .ops
            .update_file(
                &params.owner,
                &params.repo,
                &params.path,
                &params.content,
                &params.sha,
                &params.commit_message,
                params.branch.as_deref(),
            )
            .await;
        Ok(outcome_result(outcome))
    }

    #[tool(
        name = "delete_file",
        description = "Delete a file from a repository; requires the file's current blob SHA"
    )]
    async fn delete_file(
        &self,
        Parameters(params): Parameters<DeleteFileParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .ops
            .delete_file(
                &params.owner,
                &params.repo,
                &params.path,
                &params.sha,
                &params.commit_message,
                params.branch.as_deref(),
            )
            .await;
        Ok(outcome_result(outcome))
    }

    #[tool(
        name = "get_file",
        description = "Get file metadata, base64 content and decoded text, including the blob SHA used by update_file and delete_file"
    )]
    async fn get_file(
        &self,
        Parameters(params): Parameters<GetFileParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .ops
            .get_file(
                &params.owner,
                &params.repo,
                &params.path,
                params.git_ref.as_deref(),
            )
            .await;
        Ok(outcome_result(ops::with_decoded_content(outcome)))
    }
}

#[tool_handler]
impl ServerHandler for McpGithubServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-github-admin".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "GitHub admin server. Use git_info to look up a user, create_repo/delete_repo \
                 to manage repositories, get_file to read a file and its SHA, and \
                 create_file/update_file/delete_file to commit file changes. Failed reads and \
                 writes return null; failed deletes return {\"error\": ...} with GitHub's response."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_repo_params_defaults() {
        let params: CreateRepoParams =
            serde_json::from_value(serde_json::json!({"repo_name": "demo"})).unwrap();
        assert_eq!(params.repo_name, "demo");
        assert!(params.private);
        assert!(params.description.is_none());
    }

    #[test]
    fn test_create_repo_params_explicit_public() {
        let params: CreateRepoParams = serde_json::from_value(serde_json::json!({
            "repo_name": "demo",
            "private": false,
            "description": "a demo",
        }))
        .unwrap();
        assert!(!params.private);
        assert_eq!(params.description.as_deref(), Some("a demo"));
    }

    #[test]
    fn test_file_params_branch_is_optional() {
        let params: DeleteFileParams = serde_json::from_value(serde_json::json!({
            "owner": "alice",
            "repo": "demo",
            "path": "README.md",
            "sha": "abc123",
            "commit_message": "remove readme",
        }))
        .unwrap();
        assert!(params.branch.is_none());
    }

    #[test]
    fn test_get_file_params_ref_rename() {
        let params: GetFileParams = serde_json::from_value(serde_json::json!({
            "owner": "alice",
            "repo": "demo",
            "path": "src/main.rs",
            "ref": "dev",
        }))
        .unwrap();
        assert_eq!(params.git_ref.as_deref(), Some("dev"));
    }

    #[test]
    fn test_outcome_result_renders_null_for_soft_failure() {
        let result = outcome_result(Outcome::SoftFailure);
        let text = serde_json::to_value(&result).unwrap();
        assert_eq!(text["content"][0]["text"], "null");
    }

    #[test]
    fn test_outcome_result_renders_error_body() {
        let result = outcome_result(Outcome::Rejected {
            body: "Not Found".to_string(),
        });
        let text = serde_json::to_value(&result).unwrap();
        let rendered: serde_json::Value =
            serde_json::from_str(text["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(rendered, serde_json::json!({"error": "Not Found"}));
    }
}
