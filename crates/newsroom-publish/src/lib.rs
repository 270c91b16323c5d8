//! Announces news items on Twitter/X and retracts them again.

pub mod notice;
pub mod oauth;
pub mod twitter;

use async_trait::async_trait;
use thiserror::Error;

use newsroom_types::models::NewsItem;

pub use oauth::OAuthCredentials;
pub use twitter::{TwitterConfig, TwitterGateway};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("thumbnail fetch failed: {0}")]
    Fetch(String),

    #[error("media upload failed: {0}")]
    Upload(String),

    #[error("post creation failed: {0}")]
    Post(String),

    #[error("post creation returned no usable id")]
    MissingPostId,

    #[error("post retraction failed: {0}")]
    Retract(String),

    #[error("invalid permalink: {0}")]
    Permalink(String),

    #[error("invalid endpoint {0}")]
    Endpoint(String),

    #[error("request signing failed: {0}")]
    Signing(String),
}

/// The external publishing side effect of the news lifecycle.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Posts a notice for `item` and returns the external post id.
    async fn publish(&self, item: &NewsItem) -> Result<i64, PublishError>;

    /// Deletes a previously published post. `Ok(false)` means the service
    /// answered but did not confirm the deletion.
    async fn retract(&self, post_id: i64) -> Result<bool, PublishError>;
}
