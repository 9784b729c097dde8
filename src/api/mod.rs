//! API module for the chaos message board
//!
//! This module provides the seam between `MessageBoard` and the remote
//! message service. The board only ever talks to a `MessageApi`, so hosts
//! and tests can swap the transport without touching board logic.
//!
//! # Architecture
//!
//! - `http` - `HttpMessageApi`, the reqwest-backed implementation
//!
//! # Usage
//!
//! ```rust,no_run
//! use chaosboard::api::{HttpMessageApi, MessageApi};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = HttpMessageApi::new("https://chaos-message-board.yukiyu.workers.dev");
//! let envelope = api.list_messages(1, 10).await?;
//! println!("success: {}", envelope.success);
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::HttpMessageApi;

use crate::types::{ApiEnvelope, MessagePage, NewMessage};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unreadable response ({status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote message service.
///
/// Implementations return the decoded envelope regardless of HTTP status;
/// the `success` flag in the body is what decides the outcome.
#[async_trait]
pub trait MessageApi: Send + Sync {
    /// `GET /api/messages?page={page}&pageSize={page_size}`
    async fn list_messages(
        &self,
        page: u32,
        page_size: u32,
    ) -> ApiResult<ApiEnvelope<MessagePage>>;

    /// `POST /api/messages`
    async fn create_message(&self, message: &NewMessage) -> ApiResult<ApiEnvelope<Value>>;
}
