//! MCP server that lets LLMs manage GitHub repositories and commit file changes.
//!
//! Every tool funnels through one request dispatcher that picks the HTTP verb
//! and interprets the response status from a fixed set of intents.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod server;
