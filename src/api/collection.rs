//! Per-resource operations
//!
//! The same contract for templates, sending profiles, pages, groups, and campaigns.
//! Name and pattern lookups list the whole collection and scan it client-side; the remote
//! collections are small and have no search endpoint.

use std::marker::PhantomData;

use regex::Regex;

use super::client::ApiClient;
use crate::error::{Error, Result};
use crate::models::{GenericResponse, Resource};

/// Typed handle on one remote collection
pub struct Collection<'a, R> {
    client: &'a ApiClient,
    _kind: PhantomData<R>,
}

impl<'a, R: Resource> Collection<'a, R> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    fn list_url(&self) -> String {
        self.client.collection_url(R::ENDPOINT)
    }

    fn item_url(&self, id: i64) -> String {
        self.client.item_url(R::ENDPOINT, id)
    }

    fn not_found(key: impl ToString) -> Error {
        Error::NotFound {
            kind: R::KIND,
            key: key.to_string(),
        }
    }

    /// Fetch the whole collection
    pub async fn list(&self) -> Result<Vec<R>> {
        self.client.get(&self.list_url()).await
    }

    /// Fetch one record. A success response carrying identity `0` means there is no such
    /// record and yields `None`; error statuses are errors.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<R>> {
        let value: R = self.client.get(&self.item_url(id)).await?;
        Ok((value.id() != 0).then_some(value))
    }

    /// First record whose name matches exactly
    pub async fn get_by_name(&self, name: &str) -> Result<Option<R>> {
        Ok(self.list().await?.into_iter().find(|r| r.name() == name))
    }

    /// Like [`get_by_name`](Self::get_by_name), but absence is an error
    pub async fn require_by_name(&self, name: &str) -> Result<R> {
        self.get_by_name(name)
            .await?
            .ok_or_else(|| Self::not_found(name))
    }

    /// Records whose name matches `pattern`. The pattern is compiled before any request.
    pub async fn get_by_regex(&self, pattern: &str) -> Result<Vec<R>> {
        let regex = Regex::new(pattern)?;
        self.get_matching(&regex).await
    }

    /// Records whose name matches an already compiled pattern
    pub async fn get_matching(&self, regex: &Regex) -> Result<Vec<R>> {
        let mut items = self.list().await?;
        items.retain(|r| regex.is_match(r.name()));
        Ok(items)
    }

    /// Create a record. The identity sent is always `0`; the returned value carries the
    /// identity the server assigned.
    pub async fn create(&self, resource: &R) -> Result<R> {
        let body = resource.create_body()?;
        let created: R = self.client.post(&self.list_url(), &body).await?;
        tracing::info!("Created {} '{}' (id {})", R::KIND, created.name(), created.id());
        Ok(created)
    }

    /// Replace record `id`. The identity sent is always `id`.
    pub async fn update(&self, id: i64, resource: &R) -> Result<R> {
        let body = resource.update_body(id)?;
        let updated: R = self.client.put(&self.item_url(id), &body).await?;
        tracing::info!("Updated {} '{}' (id {})", R::KIND, resource.name(), id);
        Ok(updated)
    }

    /// Update the record with the same name, or create it when there is none.
    ///
    /// Kinds the server cannot update in place (campaigns) are left unchanged when a
    /// record with the same name exists, and that record is returned.
    pub async fn sync(&self, resource: &R) -> Result<R> {
        match self.get_by_name(resource.name()).await? {
            Some(existing) if R::UPDATABLE => self.update(existing.id(), resource).await,
            Some(existing) => {
                tracing::info!(
                    "{} '{}' already exists (id {}), leaving it unchanged",
                    R::KIND,
                    existing.name(),
                    existing.id()
                );
                Ok(existing)
            }
            None => self.create(resource).await,
        }
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<GenericResponse> {
        let response = self.client.delete(&self.item_url(id)).await?;
        tracing::info!("Deleted {} {}", R::KIND, id);
        Ok(response)
    }

    /// Delete the first record with this name; fails without a request when none exists
    pub async fn delete_by_name(&self, name: &str) -> Result<GenericResponse> {
        let existing = self.require_by_name(name).await?;
        self.delete_by_id(existing.id()).await
    }
}
