use super::{ApiError, ApiResult, MessageApi};
use crate::types::{ApiEnvelope, MessagePage, NewMessage};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

const MESSAGES_PATH: &str = "/api/messages";

/// `MessageApi` over HTTP.
pub struct HttpMessageApi {
    client: Client,
    base_url: String,
}

impl HttpMessageApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self) -> String {
        format!("{}{}", self.base_url, MESSAGES_PATH)
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> ApiResult<ApiEnvelope<T>> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode { status, source })
}

#[async_trait]
impl MessageApi for HttpMessageApi {
    async fn list_messages(
        &self,
        page: u32,
        page_size: u32,
    ) -> ApiResult<ApiEnvelope<MessagePage>> {
        let url = self.messages_url();
        debug!(%url, page, page_size, "fetching messages");

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        decode(status, &body)
    }

    async fn create_message(&self, message: &NewMessage) -> ApiResult<ApiEnvelope<Value>> {
        let url = self.messages_url();
        debug!(%url, username = %message.username, "posting message");

        let response = self.client.post(&url).json(message).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode(status, &body)
    }
}
