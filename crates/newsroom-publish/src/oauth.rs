//! OAuth 1.0a request signing (HMAC-SHA1), as required by the Twitter API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use hmac::{Hmac, Mac};
use rand::distr::{Alphanumeric, SampleString};
use sha1::Sha1;
use urlencoding::encode;
use url::{Position, Url};

use crate::PublishError;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl OAuthCredentials {
    /// Builds the `Authorization` header for a request.
    ///
    /// `params` are the form-encoded body parameters; query parameters are
    /// read from `url`. JSON bodies are not part of the signature.
    pub fn authorization(
        &self,
        method: &str,
        url: &Url,
        params: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let nonce = Alphanumeric.sample_string(&mut rand::rng(), 32);
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_with(method, url, params, &nonce, timestamp)
    }

    fn authorization_with(
        &self,
        method: &str,
        url: &Url,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String, PublishError> {
        let timestamp = timestamp.to_string();
        let mut oauth = vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.signature(method, url, params, &oauth)?;
        oauth.push(("oauth_signature", signature.as_str()));
        oauth.sort();

        let fields: Vec<String> = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn signature(
        &self,
        method: &str,
        url: &Url,
        params: &[(&str, &str)],
        oauth: &[(&str, &str)],
    ) -> Result<String, PublishError> {
        let mut encoded: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (encode(&k).into_owned(), encode(&v).into_owned()))
            .chain(
                params
                    .iter()
                    .chain(oauth.iter())
                    .map(|(k, v)| (encode(k).into_owned(), encode(v).into_owned())),
            )
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_url = &url[..Position::AfterPath];
        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(base_url),
            encode(&param_string)
        );

        let key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.access_token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| PublishError::Signing(e.to_string()))?;
        mac.update(base_string.as_bytes());
        Ok(B64.encode(mac.finalize().into_bytes()))
    }
}
