//! Tracking client
//!
//! Simulates recipient activity against the public phishing server: opening a message
//! (tracking pixel) and clicking its link. No authentication is involved.

use reqwest::{Client, StatusCode};

use crate::api::client::normalize_base_url;
use crate::api::ClientOptions;
use crate::error::Result;

/// Overrides for the simulated recipient
#[derive(Debug, Clone, Default)]
pub struct TrackOptions {
    pub user_agent: Option<String>,
    /// Sent as `X-Forwarded-For`, recorded by the server as the source address
    pub forwarded_for: Option<String>,
}

#[derive(Clone)]
pub struct TrackingClient {
    client: Client,
    base_url: String,
}

impl TrackingClient {
    pub fn new(base_url: &str, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            client: options.builder().build()?,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Record an email open for recipient `rid`
    pub async fn track_open(&self, rid: &str, options: &TrackOptions) -> Result<StatusCode> {
        self.hit(&format!("{}/track", self.base_url), rid, options)
            .await
    }

    /// Record a link click for recipient `rid`
    pub async fn track_click(&self, rid: &str, options: &TrackOptions) -> Result<StatusCode> {
        self.hit(&format!("{}/", self.base_url), rid, options).await
    }

    async fn hit(&self, url: &str, rid: &str, options: &TrackOptions) -> Result<StatusCode> {
        tracing::debug!("GET {}?rid={}", url, rid);

        let mut request = self.client.get(url).query(&[("rid", rid)]);
        if let Some(user_agent) = &options.user_agent {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }
        if let Some(addr) = &options.forwarded_for {
            request = request.header("X-Forwarded-For", addr);
        }

        let status = request.send().await?.status();
        if !status.is_success() {
            tracing::warn!("Tracking request for {} returned {}", rid, status);
        }
        Ok(status)
    }
}
