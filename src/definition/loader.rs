//! File-backed resource loader
//!
//! Reads a YAML definition, pulls in any files it references (relative to the directory
//! holding the definition, not the working directory), then substitutes variables once.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;

use super::interpolate::{Interpolate, Interpolator, Resolved, Variables};
use super::targets::read_targets;
use crate::error::{Error, Result};
use crate::models::{Campaign, Group, Page, SendingProfile, Template};

/// A resource that can be read from a definition file
pub trait Definition: DeserializeOwned + Interpolate {
    /// Load external content referenced by the definition. `base` is the directory of the
    /// definition file. Inline content always wins over a file reference.
    fn include_files(&mut self, _base: &Path) -> Result<()> {
        Ok(())
    }
}

/// Load a definition with strict variable substitution
pub fn load<T: Definition>(path: impl AsRef<Path>, vars: &Variables) -> Result<Resolved<T>> {
    load_with(path, &Interpolator::new(vars))
}

/// Load a definition with a caller-configured interpolator
pub fn load_with<T: Definition>(
    path: impl AsRef<Path>,
    interpolator: &Interpolator<'_>,
) -> Result<Resolved<T>> {
    let path = path.as_ref();
    tracing::debug!("Loading definition {}", path.display());

    let data = read_file(path)?;
    let mut value: T = serde_yaml::from_slice(&data).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    value.include_files(base)?;

    Resolved::resolve(value, interpolator).map_err(|source| Error::Interpolation {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl Definition for Template {
    fn include_files(&mut self, base: &Path) -> Result<()> {
        for attachment in &mut self.attachments {
            let Some(file) = &attachment.file else {
                continue;
            };
            if !attachment.content.is_empty() {
                continue;
            }

            let full: PathBuf = base.join(file);
            attachment.content = STANDARD.encode(read_file(&full)?);
            if attachment.name.is_empty() {
                attachment.name = full
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
            if attachment.content_type.is_empty() {
                attachment.content_type = mime_guess::from_path(&full)
                    .first_or_octet_stream()
                    .to_string();
            }
        }
        Ok(())
    }
}

impl Definition for Page {
    fn include_files(&mut self, base: &Path) -> Result<()> {
        if let (true, Some(file)) = (self.html.is_empty(), &self.html_file) {
            let data = read_file(&base.join(file))?;
            self.html = String::from_utf8_lossy(&data).into_owned();
        }
        Ok(())
    }
}

impl Definition for Group {
    fn include_files(&mut self, base: &Path) -> Result<()> {
        if let (true, Some(file)) = (self.targets.is_empty(), &self.targets_file) {
            self.targets = read_targets(&base.join(file))?;
        }
        Ok(())
    }
}

impl Definition for SendingProfile {}

impl Definition for Campaign {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn inline_html_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("body.html"), "from file").unwrap();
        fs::write(
            dir.path().join("page.yaml"),
            "name: Portal\nhtml: inline\nhtml-file: body.html\n",
        )
        .unwrap();

        let page: Resolved<Page> = load(dir.path().join("page.yaml"), &Variables::new()).unwrap();
        assert_eq!(page.html, "inline");
    }

    #[test]
    fn attachment_file_is_encoded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("invoice.txt"), "due").unwrap();
        fs::write(
            dir.path().join("template.yaml"),
            "name: Invoice\nsubject: Invoice for {{client}}\nattachments:\n  - file: invoice.txt\n",
        )
        .unwrap();

        let template: Resolved<Template> =
            load(dir.path().join("template.yaml"), &vars(&[("client", "Acme")])).unwrap();
        assert_eq!(template.subject, "Invoice for Acme");
        let attachment = &template.attachments[0];
        assert_eq!(attachment.content, "ZHVl");
        assert_eq!(attachment.name, "invoice.txt");
        assert_eq!(attachment.content_type, "text/plain");
    }

    #[test]
    fn missing_definition_reports_path() {
        let err = load::<Group>("/nonexistent/dir/group.yaml", &Variables::new()).unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, Path::new("/nonexistent/dir/group.yaml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smtp.yaml");
        fs::write(&path, "name: [unclosed\n").unwrap();
        assert!(matches!(
            load::<SendingProfile>(&path, &Variables::new()),
            Err(Error::Yaml { .. })
        ));
    }

    #[test]
    fn unknown_variable_aborts_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smtp.yaml");
        fs::write(&path, "name: relay\nhost: \"{{smtp_host}}\"\n").unwrap();
        let err = load::<SendingProfile>(&path, &Variables::new()).unwrap_err();
        assert!(matches!(err, Error::Interpolation { .. }));
        assert!(err.to_string().contains("smtp.yaml"));
    }
}
