//! Campaigns
//!
//! A campaign refers to its template, page, sending profile, and groups by name. The remote
//! side resolves those names when the campaign is created, so the create request carries a
//! [`CampaignSubmission`] whose references are [`ByName`] stubs rather than full objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Group, Page, Render, Resource, SendingProfile, Template};
use crate::definition::{Interpolate, InterpolationError, Interpolator};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    #[serde(alias = "created-date", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(alias = "launch-date", skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<DateTime<Utc>>,
    #[serde(alias = "send-by-date", skip_serializing_if = "Option::is_none")]
    pub send_by_date: Option<DateTime<Utc>>,
    #[serde(alias = "completed-date", skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    pub template: Option<Template>,
    pub page: Option<Page>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<CampaignResult>,
    pub groups: Vec<Group>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<Event>,
    pub smtp: Option<SendingProfile>,
    pub url: String,
}

impl Campaign {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build the name-only form sent on create.
    ///
    /// Fails before any request is made when a reference is missing.
    pub fn submission(&self) -> Result<CampaignSubmission> {
        let missing = |what: &str| {
            Error::InvalidDefinition(format!("campaign '{}' has no {}", self.name, what))
        };

        let template = self.template.as_ref().ok_or_else(|| missing("template"))?;
        let page = self.page.as_ref().ok_or_else(|| missing("page"))?;
        let smtp = self.smtp.as_ref().ok_or_else(|| missing("sending profile"))?;
        if self.groups.is_empty() {
            return Err(missing("groups"));
        }

        Ok(CampaignSubmission {
            id: 0,
            name: self.name.clone(),
            launch_date: self.launch_date,
            send_by_date: self.send_by_date,
            template: ByName::of(template),
            page: ByName::of(page),
            smtp: ByName::of(smtp),
            groups: self.groups.iter().map(ByName::of).collect(),
            url: self.url.clone(),
        })
    }
}

impl Resource for Campaign {
    const KIND: &'static str = "campaign";
    const ENDPOINT: &'static str = "campaigns";
    const UPDATABLE: bool = false;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn create_body(&self) -> Result<Value> {
        serde_json::to_value(self.submission()?).map_err(Error::Encode)
    }
}

impl Render for Campaign {}

impl Interpolate for Campaign {
    fn interpolate(&mut self, i: &Interpolator<'_>) -> Result<(), InterpolationError> {
        i.apply(&mut self.name)?;
        i.apply(&mut self.url)?;
        if let Some(template) = &mut self.template {
            i.apply(&mut template.name)?;
        }
        if let Some(page) = &mut self.page {
            i.apply(&mut page.name)?;
        }
        if let Some(smtp) = &mut self.smtp {
            i.apply(&mut smtp.name)?;
        }
        for group in &mut self.groups {
            i.apply(&mut group.name)?;
        }
        Ok(())
    }
}

/// Reference to another resource by name only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByName {
    pub name: String,
}

impl ByName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn of<R: Resource>(resource: &R) -> Self {
        Self::new(resource.name())
    }
}

/// Body of a campaign create request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSubmission {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_by_date: Option<DateTime<Utc>>,
    pub template: ByName,
    pub page: ByName,
    pub smtp: ByName,
    pub groups: Vec<ByName>,
    pub url: String,
}

/// Per-recipient outcome, read only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignResult {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub status: String,
    pub ip: String,
    pub latitude: f64,
    pub longitude: f64,
    pub send_date: String,
    pub reported: bool,
}

impl Render for CampaignResult {}

/// Timeline entry, read only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub email: String,
    pub time: String,
    pub message: String,
    pub details: String,
}

impl Render for Event {}

/// Response of `/api/campaigns/{id}/results`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignResults {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub results: Vec<CampaignResult>,
    pub timeline: Vec<Event>,
}

impl Render for CampaignResults {}
