//! Sending profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Render, Resource};
use crate::definition::{Interpolate, InterpolationError, Interpolator};
use crate::error::{Error, Result};

/// Default transport interface
pub const INTERFACE_SMTP: &str = "SMTP";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendingProfile {
    pub id: i64,
    pub name: String,
    #[serde(alias = "interface-type")]
    pub interface_type: String,
    pub host: String,
    pub username: String,
    pub password: String,
    #[serde(alias = "from-address")]
    pub from_address: String,
    #[serde(alias = "ignore-cert-errors")]
    pub ignore_cert_errors: bool,
    pub headers: Vec<Header>,
    #[serde(alias = "modified-date", skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,
}

/// Extra mail header added to each message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl SendingProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Resource for SendingProfile {
    const KIND: &'static str = "sending profile";
    const ENDPOINT: &'static str = "smtp";

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
        let mut body = self.clone();
        body.id = 0;
        if body.interface_type.is_empty() {
            body.interface_type = INTERFACE_SMTP.to_string();
        }
        serde_json::to_value(&body).map_err(Error::Encode)
    }
}

impl Render for SendingProfile {}

impl Interpolate for SendingProfile {
    fn interpolate(&mut self, i: &Interpolator<'_>) -> Result<(), InterpolationError> {
        i.apply(&mut self.name)?;
        i.apply(&mut self.host)?;
        i.apply(&mut self.username)?;
        i.apply(&mut self.password)?;
        i.apply(&mut self.from_address)?;
        for header in &mut self.headers {
            i.apply(&mut header.key)?;
            i.apply(&mut header.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_interface_to_smtp() {
        let mut profile = SendingProfile::new("relay");
        profile.id = 9;
        let body = profile.create_body().unwrap();
        assert_eq!(body["interface_type"], "SMTP");
        assert_eq!(body["id"], 0);
    }

    #[test]
    fn explicit_interface_is_kept() {
        let profile = SendingProfile {
            interface_type: "SES".into(),
            ..SendingProfile::new("ses")
        };
        assert_eq!(profile.create_body().unwrap()["interface_type"], "SES");
    }
}
