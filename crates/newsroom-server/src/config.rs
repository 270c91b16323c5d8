use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};

use newsroom_publish::twitter::{DEFAULT_API_BASE, DEFAULT_UPLOAD_BASE};
use newsroom_publish::{OAuthCredentials, TwitterConfig};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

const DEFAULT_PERMALINK_BASE: &str = "https://newsroom.timos.design";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub request_timeout: Duration,
    pub twitter: TwitterConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.into());
        let required = |key: &str| match var(key) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(anyhow!("{} is not set", key)),
        };

        let jwt_secret = var("NEWSROOM_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("NEWSROOM_JWT_SECRET is unset or still a placeholder; it must match the account service's secret");
        }

        let port: u16 = or("NEWSROOM_PORT", "3000")
            .parse()
            .context("NEWSROOM_PORT must be a port number")?;
        let timeout_secs: u64 = or("NEWSROOM_REQUEST_TIMEOUT_SECS", "15")
            .parse()
            .context("NEWSROOM_REQUEST_TIMEOUT_SECS must be a number of seconds")?;

        let credentials = OAuthCredentials {
            consumer_key: required("TWITTER_API_KEY")?,
            consumer_secret: required("TWITTER_API_SECRET_KEY")?,
            access_token: required("TWITTER_ACCESS_TOKEN")?,
            access_token_secret: required("TWITTER_ACCESS_TOKEN_SECRET")?,
        };

        Ok(Self {
            host: or("NEWSROOM_HOST", "0.0.0.0"),
            port,
            db_path: or("NEWSROOM_DB_PATH", "newsroom.db").into(),
            jwt_secret,
            request_timeout: Duration::from_secs(timeout_secs),
            twitter: TwitterConfig {
                credentials,
                api_base: or("TWITTER_API_BASE", DEFAULT_API_BASE),
                upload_base: or("TWITTER_UPLOAD_BASE", DEFAULT_UPLOAD_BASE),
                permalink_base: or("NEWSROOM_PERMALINK_BASE", DEFAULT_PERMALINK_BASE),
            },
        })
    }
}
