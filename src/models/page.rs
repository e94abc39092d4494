//! Landing pages

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::impl_resource;
use crate::definition::{Interpolate, InterpolationError, Interpolator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub html: String,
    /// HTML body file, relative to the definition file. Never sent.
    #[serde(alias = "html-file", skip_serializing)]
    pub html_file: Option<PathBuf>,
    #[serde(alias = "capture-credentials")]
    pub capture_credentials: bool,
    #[serde(alias = "capture-passwords")]
    pub capture_passwords: bool,
    #[serde(alias = "modified-date", skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,
    #[serde(alias = "redirect-url")]
    pub redirect_url: String,
}

impl_resource!(Page, "landing page", "pages");

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Interpolate for Page {
    fn interpolate(&mut self, i: &Interpolator<'_>) -> Result<(), InterpolationError> {
        i.apply(&mut self.name)?;
        i.preserving().apply(&mut self.html)?;
        i.apply(&mut self.redirect_url)
    }
}

/// Request for `/api/import/site`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSite {
    pub url: String,
    pub include_resources: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImportedSite {
    pub html: String,
}
