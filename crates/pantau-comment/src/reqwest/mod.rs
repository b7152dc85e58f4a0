//! Reqwest-based HTTP transport for the comment API.
//!
//! This module provides a reqwest-based implementation of the
//! [`CommentTransport`](crate::CommentTransport) trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use pantau_comment::reqwest::{ReqwestClient, ReqwestConfig};
//! use pantau_comment::{CommentApi, ResourceRef};
//!
//! let config = ReqwestConfig::default().with_api_token(token);
//! let api: CommentApi = ReqwestClient::new(config)?.into_api();
//!
//! let comments = api.fetch_comments(ResourceRef::berita(1)).await?;
//! ```

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "pantau_comment::reqwest";
