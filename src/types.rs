use crate::validation::trim_input;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Editable fields of the compose form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub username: String,
    pub email: String,
    pub content: String,
}

/// One board entry as returned by the server.
///
/// Fields the client does not know about are kept in `extra` so they survive
/// the round trip to the rendering layer untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub created_at: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn first(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            total: 0,
            total_pages: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitStatus {
    pub kind: StatusKind,
    pub message: String,
}

/// Envelope shared by every endpoint: `{ success, data?, error? }`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub pagination: Pagination,
}

/// Body of `POST /api/messages`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub username: String,
    pub email: String,
    pub content: String,
}

impl NewMessage {
    /// Builds the request body from the form, trimming every field.
    pub fn from_form(form: &FormState) -> Self {
        Self {
            username: trim_input(&form.username).to_string(),
            email: trim_input(&form.email).to_string(),
            content: trim_input(&form.content).to_string(),
        }
    }
}
