use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored news item, as returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: Uuid,
    pub title: String,
    pub project: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    /// Creation time in epoch milliseconds, set by the server.
    pub timestamp: i64,
    pub content: String,
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_post_id: Option<i64>,
}

/// Caller-supplied record for create and update.
///
/// Only caller-settable fields exist here, so `id`, `timestamp` and
/// `externalPostId` in a request body are dropped during deserialization.
/// Missing fields default to empty, which the projector treats as "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsInput {
    pub title: String,
    /// Project identifier as sent by the caller; parsed during validation.
    pub project: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub thumbnail: String,
    pub featured: Option<String>,
}
