//! Admin API client
//!
//! Holds the base URL and API key, and hands out typed [`Collection`] handles for each
//! resource kind. Every call goes to the server; nothing is cached between calls.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::auth::Bootstrap;
use super::collection::Collection;
use super::http::{ClientOptions, HttpClient};
use crate::error::{Error, Result};
use crate::models::{
    Campaign, CampaignResults, GenericResponse, Group, GroupSummaries, GroupSummary, ImportSite,
    ImportedSite, Page, Resource, SendingProfile, Template,
};

/// Validate a base URL and strip any trailing slash
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String> {
    Url::parse(base_url)?;
    Ok(base_url.trim_end_matches('/').to_string())
}

/// Client for the admin API
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a client with default transport options
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Self::with_options(base_url, api_key, &ClientOptions::default())
    }

    pub fn with_options(base_url: &str, api_key: &str, options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(options)?,
            base_url: normalize_base_url(base_url)?,
            api_key: api_key.to_string(),
        })
    }

    /// Log in with a username and password and use the scraped API key
    pub async fn from_credentials(
        base_url: &str,
        username: &str,
        password: &str,
        options: &ClientOptions,
    ) -> Result<Self> {
        let api_key = Bootstrap::new(base_url, options)?
            .api_key(username, password)
            .await?;
        Self::with_options(base_url, &api_key, options)
    }

    /// A copy of this client whose requests each time out after `timeout`
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            http: self.http.with_timeout(timeout),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build an admin API URL
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// URL of a whole collection, used for list and create
    pub fn collection_url(&self, endpoint: &str) -> String {
        self.api_url(&format!("{}/", endpoint))
    }

    /// URL of one record, used for get, update, and delete
    pub fn item_url(&self, endpoint: &str, id: i64) -> String {
        self.api_url(&format!("{}/{}", endpoint, id))
    }

    // =========================================================================
    // Requests
    // =========================================================================

    pub(crate) async fn get<T: DeserializeOwned + Default>(&self, url: &str) -> Result<T> {
        self.http.get(url, &self.api_key).await
    }

    pub(crate) async fn post<T: DeserializeOwned + Default>(&self, url: &str, body: &Value) -> Result<T> {
        self.http.post(url, &self.api_key, body).await
    }

    pub(crate) async fn put<T: DeserializeOwned + Default>(&self, url: &str, body: &Value) -> Result<T> {
        self.http.put(url, &self.api_key, body).await
    }

    pub(crate) async fn delete<T: DeserializeOwned + Default>(&self, url: &str) -> Result<T> {
        self.http.delete(url, &self.api_key).await
    }

    // =========================================================================
    // Collections
    // =========================================================================

    pub fn collection<R: Resource>(&self) -> Collection<'_, R> {
        Collection::new(self)
    }

    pub fn templates(&self) -> Collection<'_, Template> {
        self.collection()
    }

    pub fn sending_profiles(&self) -> Collection<'_, SendingProfile> {
        self.collection()
    }

    pub fn pages(&self) -> Collection<'_, Page> {
        self.collection()
    }

    pub fn groups(&self) -> Collection<'_, Group> {
        self.collection()
    }

    pub fn campaigns(&self) -> Collection<'_, Campaign> {
        self.collection()
    }

    // =========================================================================
    // Group summaries
    // =========================================================================

    /// Every group with its target count, without target bodies
    pub async fn group_summaries(&self) -> Result<GroupSummaries> {
        self.get(&self.api_url("groups/summary")).await
    }

    pub async fn group_summary(&self, id: i64) -> Result<GroupSummary> {
        let summary: GroupSummary = self
            .get(&self.api_url(&format!("groups/{}/summary", id)))
            .await?;
        if summary.id == 0 {
            return Err(Error::NotFound {
                kind: "group",
                key: id.to_string(),
            });
        }
        Ok(summary)
    }

    pub async fn group_summary_by_name(&self, name: &str) -> Result<GroupSummary> {
        self.group_summaries()
            .await?
            .groups
            .into_iter()
            .find(|g| g.name == name)
            .ok_or_else(|| Error::NotFound {
                kind: "group",
                key: name.to_string(),
            })
    }

    // =========================================================================
    // Pages and campaigns
    // =========================================================================

    /// Have the server fetch a site and return its HTML, for use as a page body
    pub async fn import_site(&self, request: &ImportSite) -> Result<String> {
        let body = serde_json::to_value(request).map_err(Error::Encode)?;
        let imported: ImportedSite = self.post(&self.api_url("import/site"), &body).await?;
        Ok(imported.html)
    }

    pub async fn campaign_results(&self, id: i64) -> Result<CampaignResults> {
        let results: CampaignResults = self
            .get(&self.api_url(&format!("campaigns/{}/results", id)))
            .await?;
        if results.id == 0 {
            return Err(Error::NotFound {
                kind: Campaign::KIND,
                key: id.to_string(),
            });
        }
        Ok(results)
    }

    /// Mark a campaign complete; no further events are recorded
    pub async fn complete_campaign(&self, id: i64) -> Result<GenericResponse> {
        let response = self
            .get(&self.api_url(&format!("campaigns/{}/complete", id)))
            .await?;
        tracing::info!("Completed campaign {}", id);
        Ok(response)
    }
}
