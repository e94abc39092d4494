//! Recipient groups

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{impl_resource, Render};
use crate::definition::{Interpolate, InterpolationError, Interpolator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub targets: Vec<Target>,
    /// CSV or YAML target list, relative to the definition file. Never sent.
    #[serde(alias = "targets-file", skip_serializing)]
    pub targets_file: Option<PathBuf>,
    #[serde(alias = "modified-date", skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,
}

impl_resource!(Group, "group", "groups");

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Interpolate for Group {
    fn interpolate(&mut self, i: &Interpolator<'_>) -> Result<(), InterpolationError> {
        i.apply(&mut self.name)?;
        for target in &mut self.targets {
            target.interpolate(i)?;
        }
        Ok(())
    }
}

/// One recipient. The email address is the natural key.
///
/// Accepts the wire names, the kebab-case definition keys, and the CSV header names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    #[serde(alias = "first-name", alias = "First Name")]
    pub first_name: String,
    #[serde(alias = "last-name", alias = "Last Name")]
    pub last_name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Position")]
    pub position: String,
}

impl Target {
    /// True when every field is empty, as produced by an unrecognised CSV header
    pub fn is_blank(&self) -> bool {
        self.first_name.is_empty()
            && self.last_name.is_empty()
            && self.email.is_empty()
            && self.position.is_empty()
    }
}

impl Interpolate for Target {
    fn interpolate(&mut self, i: &Interpolator<'_>) -> Result<(), InterpolationError> {
        i.apply(&mut self.first_name)?;
        i.apply(&mut self.last_name)?;
        i.apply(&mut self.email)?;
        i.apply(&mut self.position)
    }
}

/// Group without its target bodies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSummary {
    pub id: i64,
    pub name: String,
    pub num_targets: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,
}

impl Render for GroupSummary {}

/// Response of `/api/groups/summary`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSummaries {
    pub total: i64,
    pub groups: Vec<GroupSummary>,
}

impl Render for GroupSummaries {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_accept_all_key_spellings() {
        let yaml = "- first-name: Ada\n  last-name: Lovelace\n  email: ada@example.com\n";
        let targets: Vec<Target> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(targets[0].first_name, "Ada");

        let json = r#"{"first_name":"Alan","last_name":"Turing","email":"alan@example.com","position":"Eng"}"#;
        let target: Target = serde_json::from_str(json).unwrap();
        assert_eq!(target.position, "Eng");
    }

    #[test]
    fn wire_form_omits_targets_file() {
        let group = Group {
            targets_file: Some("targets.csv".into()),
            ..Group::new("Finance")
        };
        let json = serde_json::to_value(&group).unwrap();
        assert!(json.get("targets_file").is_none());
        assert_eq!(json["targets"], serde_json::json!([]));
    }
}
