//! Target list files
//!
//! A group's targets may live in a separate file: CSV (with the header row
//! `First Name,Last Name,Email,Position`, or with no header at all) or a YAML list.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, Result};
use crate::models::Target;

/// Target fields a CSV column can map onto
const TARGET_COLUMNS: &[&str] = &["first_name", "last_name", "email", "position"];

/// Map a header cell to its target field name, ignoring case and word separators.
/// Unknown names pass through.
fn canonical_column(header: &str) -> String {
    let words: Vec<String> = header
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    let joined = words.join("_");
    if TARGET_COLUMNS.contains(&joined.as_str()) {
        joined
    } else {
        header.to_string()
    }
}

/// Read a target list, choosing the format by extension
pub fn read_targets(path: &Path) -> Result<Vec<Target>> {
    let data = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_csv(path) {
        parse_csv(&data).map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_slice(&data).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Parse CSV targets.
///
/// The first row is tried as a header, matched to target fields regardless of case and
/// word separators. When it names none of the target columns, no
/// record can be mapped, and the whole file is re-read without a header, mapping columns
/// positionally to first name, last name, email, position.
pub fn parse_csv(data: &[u8]) -> Result<Vec<Target>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers: StringRecord = reader.headers()?.iter().map(canonical_column).collect();
    let recognised = headers.iter().any(|h| TARGET_COLUMNS.contains(&h));
    reader.set_headers(headers);

    let mut targets = Vec::new();
    for record in reader.deserialize::<Target>() {
        let target = record?;
        if !target.is_blank() {
            targets.push(target);
        }
    }

    if targets.is_empty() && !recognised {
        tracing::warn!("CSV header names no target columns, reading columns by position");
        return parse_positional(data);
    }

    Ok(targets)
}

fn parse_positional(data: &[u8]) -> Result<Vec<Target>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut targets = Vec::new();
    for record in reader.records() {
        let target = target_from_record(&record?);
        if !target.is_blank() {
            targets.push(target);
        }
    }
    Ok(targets)
}

fn target_from_record(record: &StringRecord) -> Target {
    let column = |i: usize| record.get(i).unwrap_or_default().to_string();
    Target {
        first_name: column(0),
        last_name: column(1),
        email: column(2),
        position: column(3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_standard_header() {
        let csv = "First Name,Last Name,Email,Position\n\
                   Ada,Lovelace,ada@example.com,Analyst\n\
                   Alan,Turing,alan@example.com,Engineer\n\
                   Grace,Hopper,grace@example.com,Admiral\n";
        let targets = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[2].email, "grace@example.com");
        assert_eq!(targets[0].position, "Analyst");
    }

    #[test]
    fn header_order_does_not_matter() {
        let csv = "Email,Position,Last Name,First Name\nada@example.com,Analyst,Lovelace,Ada\n";
        let targets = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(targets[0].first_name, "Ada");
        assert_eq!(targets[0].email, "ada@example.com");
    }

    #[test]
    fn headerless_file_is_read_positionally() {
        let csv = "Ada,Lovelace,ada@example.com,Analyst\n\
                   Alan,Turing,alan@example.com,Engineer\n\
                   Grace,Hopper,grace@example.com,Admiral\n";
        let targets = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(
            targets[0],
            Target {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "ada@example.com".into(),
                position: "Analyst".into(),
            }
        );
    }

    #[test]
    fn short_rows_leave_missing_columns_empty() {
        let targets = parse_csv(b"Ada,Lovelace,ada@example.com\n").unwrap();
        assert_eq!(targets[0].email, "ada@example.com");
        assert!(targets[0].position.is_empty());
    }

    #[test]
    fn header_names_ignore_case_and_separators() {
        let csv = "first name,LAST-NAME, Email ,position\nAda,Lovelace,ada@example.com,Analyst\n";
        let targets = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(
            targets,
            vec![Target {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "ada@example.com".into(),
                position: "Analyst".into(),
            }]
        );
    }

    #[test]
    fn canonical_column_passes_unknown_names_through() {
        assert_eq!(canonical_column("First Name"), "first_name");
        assert_eq!(canonical_column("first_name"), "first_name");
        assert_eq!(canonical_column("Department"), "Department");
    }

    #[test]
    fn header_only_file_yields_no_targets() {
        let targets = parse_csv(b"First Name,Last Name,Email,Position\n").unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_csv(Path::new("/tmp/list.CSV")));
        assert!(!is_csv(Path::new("/tmp/list.yaml")));
    }
}
