use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use newsroom_types::models::NewsItem;

use crate::oauth::OAuthCredentials;
use crate::{PublishError, Publisher, notice};

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";
pub const DEFAULT_UPLOAD_BASE: &str = "https://upload.twitter.com";

/// Largest image the simple media upload accepts.
pub const MAX_MEDIA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub credentials: OAuthCredentials,
    pub api_base: String,
    pub upload_base: String,
    /// Site the posted permalink points at.
    pub permalink_base: String,
}

// -- Response types --

#[derive(Debug, Deserialize)]
struct MediaUpload {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DeletedTweet {
    deleted: bool,
}

// -- Gateway --

/// Twitter/X implementation of [`Publisher`]. Cheap to share: the inner
/// `reqwest::Client` pools connections across requests.
pub struct TwitterGateway {
    http: reqwest::Client,
    config: TwitterConfig,
}

impl TwitterGateway {
    pub fn new(http: reqwest::Client, config: TwitterConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, base: &str, path: &str) -> Result<Url, PublishError> {
        let raw = format!("{}{}", base.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| PublishError::Endpoint(format!("'{}': {}", raw, e)))
    }

    async fn fetch_thumbnail(&self, thumbnail: &str) -> Result<Vec<u8>, PublishError> {
        let mut res = self
            .http
            .get(thumbnail)
            .send()
            .await
            .map_err(|e| PublishError::Fetch(format!("{}: {}", thumbnail, e)))?;

        let status = res.status();
        if !status.is_success() {
            return Err(PublishError::Fetch(format!("{} returned {}", thumbnail, status)));
        }

        let too_large = || PublishError::Fetch(format!("{} exceeds {} bytes", thumbnail, MAX_MEDIA_BYTES));
        if res.content_length().is_some_and(|len| len > MAX_MEDIA_BYTES) {
            return Err(too_large());
        }

        // Content-Length may be absent, so the cap also applies while reading.
        let mut image = Vec::new();
        while let Some(chunk) = res
            .chunk()
            .await
            .map_err(|e| PublishError::Fetch(format!("{}: {}", thumbnail, e)))?
        {
            if (image.len() + chunk.len()) as u64 > MAX_MEDIA_BYTES {
                return Err(too_large());
            }
            image.extend_from_slice(&chunk);
        }
        debug!("Fetched thumbnail {} ({} bytes)", thumbnail, image.len());
        Ok(image)
    }

    async fn upload_media(&self, image: &[u8]) -> Result<String, PublishError> {
        let endpoint = self.endpoint(&self.config.upload_base, "/1.1/media/upload.json")?;
        let media_data = B64.encode(image);

        let auth = self
            .config
            .credentials
            .authorization("POST", &endpoint, &[("media_data", media_data.as_str())])?;
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("media_data", &media_data)
            .finish();

        let res = self
            .http
            .post(endpoint)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Upload(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let error_body = res.text().await.unwrap_or_default();
            return Err(PublishError::Upload(format!("{}: {}", status, error_body)));
        }

        let media: MediaUpload = res.json().await.map_err(|e| PublishError::Upload(e.to_string()))?;
        Ok(media.media_id_string)
    }

    async fn post_tweet(&self, text: &str, media_id: &str) -> Result<i64, PublishError> {
        let url = self.endpoint(&self.config.api_base, "/2/tweets")?;
        let auth = self.config.credentials.authorization("POST", &url, &[])?;

        let res = self
            .http
            .post(url)
            .header(AUTHORIZATION, auth)
            .json(&json!({
                "text": text,
                "media": { "media_ids": [media_id] },
            }))
            .send()
            .await
            .map_err(|e| PublishError::Post(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let error_body = res.text().await.unwrap_or_default();
            return Err(PublishError::Post(format!("{}: {}", status, error_body)));
        }

        let created: Envelope<CreatedTweet> =
            res.json().await.map_err(|e| PublishError::Post(e.to_string()))?;

        created
            .data
            .and_then(|tweet| tweet.id.parse().ok())
            .ok_or(PublishError::MissingPostId)
    }
}

#[async_trait]
impl Publisher for TwitterGateway {
    async fn publish(&self, item: &NewsItem) -> Result<i64, PublishError> {
        let image = self.fetch_thumbnail(&item.thumbnail).await?;
        let media_id = self.upload_media(&image).await?;
        let text = notice::compose(&self.config.permalink_base, item)?;
        let post_id = self.post_tweet(&text, &media_id).await?;

        info!("Published news {} as post {}", item.id, post_id);
        Ok(post_id)
    }

    async fn retract(&self, post_id: i64) -> Result<bool, PublishError> {
        let url = self.endpoint(&self.config.api_base, &format!("/2/tweets/{}", post_id))?;
        let auth = self.config.credentials.authorization("DELETE", &url, &[])?;

        let res = self
            .http
            .delete(url)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| PublishError::Retract(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let error_body = res.text().await.unwrap_or_default();
            return Err(PublishError::Retract(format!("{}: {}", status, error_body)));
        }

        let deleted: Envelope<DeletedTweet> =
            res.json().await.map_err(|e| PublishError::Retract(e.to_string()))?;
        let deleted = deleted.data.is_some_and(|d| d.deleted);
        if !deleted {
            warn!("Post {} was not confirmed deleted", post_id);
        }
        Ok(deleted)
    }
}
