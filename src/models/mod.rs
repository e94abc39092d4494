//! Resource models
//!
//! Plain value types mirroring the admin API's JSON. Definition files use the same types:
//! YAML keys are kebab-case aliases of the snake_case wire names, and file-reference keys
//! (`html-file`, `targets-file`, attachment `file`) are never serialized to the wire.
//!
//! # Module Structure
//!
//! - [`template`] - Email templates and their attachments
//! - [`page`] - Landing pages
//! - [`smtp`] - Sending profiles
//! - [`group`] - Recipient groups, targets, and group summaries
//! - [`campaign`] - Campaigns, their name-only submission form, results, and timeline events

pub mod campaign;
pub mod group;
pub mod page;
pub mod smtp;
pub mod template;

pub use campaign::{ByName, Campaign, CampaignResult, CampaignResults, CampaignSubmission, Event};
pub use group::{Group, GroupSummaries, GroupSummary, Target};
pub use page::{ImportSite, ImportedSite, Page};
pub use smtp::{Header, SendingProfile, INTERFACE_SMTP};
pub use template::{Attachment, Template};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A named, remotely managed configuration object with a numeric identity.
///
/// Identity `0` means "not assigned yet". The body helpers force the identity so the request
/// body always agrees with the operation, whatever the caller's value carried.
pub trait Resource: Serialize + DeserializeOwned + Default + Clone + Send + Sync {
    /// Human-readable kind, used in messages
    const KIND: &'static str;
    /// Collection segment under `/api/`
    const ENDPOINT: &'static str;
    /// Whether the server accepts in-place updates of this kind
    const UPDATABLE: bool = true;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn name(&self) -> &str;

    /// JSON body for a create request. The identity is always `0`.
    fn create_body(&self) -> Result<Value> {
        let mut body = self.clone();
        body.set_id(0);
        serde_json::to_value(&body).map_err(Error::Encode)
    }

    /// JSON body for an update of record `id`
    fn update_body(&self, id: i64) -> Result<Value> {
        let mut body = self.clone();
        body.set_id(id);
        serde_json::to_value(&body).map_err(Error::Encode)
    }
}

/// Indented, human-readable rendering for display and debugging
pub trait Render: Serialize {
    fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Encode)
    }
}

/// Acknowledgement returned by deletes and state changes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl Render for GenericResponse {}

macro_rules! impl_resource {
    ($ty:ty, $kind:literal, $endpoint:literal) => {
        impl $crate::models::Resource for $ty {
            const KIND: &'static str = $kind;
            const ENDPOINT: &'static str = $endpoint;

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }

            fn name(&self) -> &str {
                &self.name
            }
        }

        impl $crate::models::Render for $ty {}
    };
}

pub(crate) use impl_resource;
