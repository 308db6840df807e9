//! Single entry point for every outbound GitHub call.
//!
//! An [`Intent`] picks the HTTP verb, whether a body goes out, and how the
//! response status is read. Failures never escape [`Dispatcher::dispatch`]:
//! they come back as [`Outcome`] values.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde::Serialize;

use crate::config::{GatewayConfig, GITHUB_ACCEPT};
use crate::error::DispatchError;

pub const REPO_DELETED: &str = "Repository deleted successfully.";
pub const FILE_DELETED: &str = "File deleted successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Read,
    Create,
    Update,
    Delete,
    DeleteContent,
}

/// How a response status is turned into an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessRule {
    /// 2xx yields the parsed JSON body; anything else is a soft failure.
    JsonBody,
    /// Listed statuses yield a fixed message; anything else is returned as
    /// a structured error with the raw body.
    Fixed {
        statuses: &'static [u16],
        message: &'static str,
    },
}

impl Intent {
    pub fn method(self) -> Method {
        match self {
            Intent::Read => Method::GET,
            Intent::Create => Method::POST,
            Intent::Update => Method::PUT,
            Intent::Delete | Intent::DeleteContent => Method::DELETE,
        }
    }

    /// Whether a payload is attached. Read and Delete ignore it.
    pub fn sends_body(self) -> bool {
        match self {
            Intent::Create | Intent::Update | Intent::DeleteContent => true,
            Intent::Read | Intent::Delete => false,
        }
    }

    pub fn success_rule(self) -> SuccessRule {
        match self {
            Intent::Read | Intent::Create | Intent::Update => SuccessRule::JsonBody,
            Intent::Delete => SuccessRule::Fixed {
                statuses: &[204],
                message: REPO_DELETED,
            },
            Intent::DeleteContent => SuccessRule::Fixed {
                statuses: &[200, 204],
                message: FILE_DELETED,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Read => "read",
            Intent::Create => "create",
            Intent::Update => "update",
            Intent::Delete => "delete",
            Intent::DeleteContent => "delete_content",
        }
    }
}

/// Result of one dispatch.
///
/// Only delete intents produce `Rejected`, carrying the upstream body.
/// Read/create/update collapse every failure to `SoftFailure` (`null`).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(serde_json::Value),
    Rejected { body: String },
    SoftFailure,
}

impl Outcome {
    fn message(text: &str) -> Self {
        Outcome::Success(serde_json::json!({ "message": text }))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The caller-visible JSON: the success value, `{"error": body}`, or `null`.
    pub fn into_value(self) -> serde_json::Value {
        match self {
            Outcome::Success(value) => value,
            Outcome::Rejected { body } => serde_json::json!({ "error": body }),
            Outcome::SoftFailure => serde_json::Value::Null,
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    config: Arc<GatewayConfig>,
}

impl Dispatcher {
    pub fn new(config: GatewayConfig) -> Result<Self, DispatchError> {
        // One call per invocation: redirects would turn it into several.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(DispatchError::Client)?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Perform exactly one HTTP call for `intent` and classify the response.
    pub async fn dispatch<P>(&self, url: &str, payload: Option<&P>, intent: Intent) -> Outcome
    where
        P: Serialize + ?Sized,
    {
        match self.send(url, payload, intent).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(intent = intent.as_str(), url, error = %e, "Request failed");
                Outcome::SoftFailure
            }
        }
    }

    async fn send<P>(
        &self,
        url: &str,
        payload: Option<&P>,
        intent: Intent,
    ) -> Result<Outcome, DispatchError>
    where
        P: Serialize + ?Sized,
    {
        let method = intent.method();
        tracing::debug!(intent = intent.as_str(), %method, url, "Dispatching GitHub request");

        let mut request = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, self.config.bearer())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, self.config.user_agent.as_str())
            .timeout(self.config.timeout_for(intent));

        if intent.sends_body() {
            if let Some(body) = payload {
                request = request.json(body);
            }
        }

        let response = request.send().await?;
        let status = response.status();

        match intent.success_rule() {
            SuccessRule::JsonBody => {
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(DispatchError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                let value = response
                    .json::<serde_json::Value>()
                    .await
                    .map_err(DispatchError::Decode)?;
                Ok(Outcome::Success(value))
            }
            SuccessRule::Fixed { statuses, message } => {
                if statuses.contains(&status.as_u16()) {
                    Ok(Outcome::message(message))
                } else {
                    let body = response.text().await?;
                    tracing::warn!(
                        intent = intent.as_str(),
                        url,
                        status = status.as_u16(),
                        "GitHub rejected delete"
                    );
                    Ok(Outcome::Rejected { body })
                }
            }
        }
    }
}
