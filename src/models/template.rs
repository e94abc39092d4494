//! Email templates

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::impl_resource;
use crate::definition::{Interpolate, InterpolationError, Interpolator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    pub id: i64,
    pub name: String,
    #[serde(alias = "envelope-sender", skip_serializing_if = "String::is_empty")]
    pub envelope_sender: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    #[serde(alias = "modified-date", skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<DateTime<Utc>>,
    pub attachments: Vec<Attachment>,
}

impl_resource!(Template, "template", "templates");

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Interpolate for Template {
    fn interpolate(&mut self, i: &Interpolator<'_>) -> Result<(), InterpolationError> {
        i.apply(&mut self.name)?;

        // rendered again by the server per recipient ({{.FirstName}}, {{.URL}}, ...)
        let body = i.preserving();
        body.apply(&mut self.envelope_sender)?;
        body.apply(&mut self.subject)?;
        body.apply(&mut self.text)?;
        body.apply(&mut self.html)
    }
}

/// File attached to every message sent from a template.
///
/// `content` is base64. In a definition file an attachment may name a local `file`
/// instead; the loader reads and encodes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub content: String,
    #[serde(skip_serializing)]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resource;

    #[test]
    fn create_body_zeroes_identity_and_omits_file_refs() {
        let mut template = Template::new("Quarterly bonus");
        template.id = 42;
        template.attachments.push(Attachment {
            name: "bonus.pdf".into(),
            content_type: "application/pdf".into(),
            content: "JVBERi0=".into(),
            file: Some("bonus.pdf".into()),
        });

        let body = template.create_body().unwrap();
        assert_eq!(body["id"], 0);
        assert_eq!(body["attachments"][0]["type"], "application/pdf");
        assert!(body["attachments"][0].get("file").is_none());
        // caller's value is untouched
        assert_eq!(template.id, 42);
    }

    #[test]
    fn definition_keys_are_kebab_case() {
        let yaml = "name: Payroll\nenvelope-sender: hr@example.com\nsubject: Action needed\n";
        let template: Template = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(template.envelope_sender, "hr@example.com");
        assert_eq!(template.id, 0);
    }

    #[test]
    fn server_fields_in_bodies_survive_interpolation() {
        let vars: crate::definition::Variables =
            [("client".to_string(), "Acme".to_string())].into();
        let mut template = Template {
            subject: "{{.FirstName}}, your {{client}} payslip".into(),
            html: "<a href=\"{{.URL}}\">Open</a>{{.Tracker}}".into(),
            text: "{{if .FirstName}}Hi {{.FirstName}}{{end}}".into(),
            ..Template::new("{{client}} payroll")
        };

        template.interpolate(&Interpolator::new(&vars)).unwrap();
        assert_eq!(template.name, "Acme payroll");
        assert_eq!(template.subject, "{{.FirstName}}, your Acme payslip");
        assert_eq!(template.html, "<a href=\"{{.URL}}\">Open</a>{{.Tracker}}");
        assert_eq!(template.text, "{{if .FirstName}}Hi {{.FirstName}}{{end}}");
    }

    #[test]
    fn unknown_variable_in_name_is_still_rejected() {
        let vars = crate::definition::Variables::new();
        let mut template = Template::new("{{client}} payroll");
        assert!(template.interpolate(&Interpolator::new(&vars)).is_err());
    }
}
