// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Form documents persisted as JSON: import of form definitions and
//! export of filled-in forms.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::field::FieldRecord;
use crate::utils::sanitize_file_stem;

/// A complete form: title plus its field records. `saved_at` is stamped
/// on export and ignored on import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
}

/// Parse a form document from JSON, sorting fields by position then label.
pub fn parse_form_json(json: &str) -> Result<FormDocument> {
    let mut doc: FormDocument =
        serde_json::from_str(json).context("Failed to parse form JSON")?;
    doc.fields.sort_by(|a, b| a.cmp_key().cmp(&b.cmp_key()));
    Ok(doc)
}

/// Serialize a filled form, stamped with the given save time.
pub fn to_form_json(
    title: &str,
    fields: &[FieldRecord],
    saved_at: OffsetDateTime,
) -> Result<String> {
    let doc = FormDocument {
        title: title.to_string(),
        saved_at: Some(
            saved_at
                .format(&Rfc3339)
                .context("Failed to format save timestamp")?,
        ),
        fields: fields.to_vec(),
    };
    serde_json::to_string_pretty(&doc).context("Failed to serialize form JSON")
}

/// Write a filled form to disk, creating parent directories when missing.
pub fn write_form(output: &Path, title: &str, fields: &[FieldRecord]) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = to_form_json(title, fields, OffsetDateTime::now_utc())?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write form to {}", output.display()))
}

/// Default file name offered in the save dialog.
pub fn suggested_form_name(title: &str) -> String {
    let base = sanitize_file_stem(title).to_ascii_lowercase();
    format!("{base}.json")
}

/// Append or replace the extension so saved files are always recognizable.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::{FieldKind, FieldRule, FieldValue};
    use tempfile::TempDir;

    #[test]
    fn parses_and_sorts_sample_form() {
        let json = r#"{
            "title": "Site audit",
            "fields": [
                {"label": "Zulu", "kind": "text"},
                {"label": "Mass", "kind": "number", "position": 1,
                 "unit": "kg", "units": ["kg", "t"], "required": true,
                 "rule": {"rule": "non_negative"}},
                {"label": "Alpha", "kind": "text"}
            ]
        }"#;

        let doc = parse_form_json(json).unwrap();
        assert_eq!(doc.title, "Site audit");
        assert_eq!(doc.fields.len(), 3);
        assert_eq!(doc.fields[0].label, "Mass");
        assert!(doc.fields[0].required);
        assert_eq!(doc.fields[0].unit.as_deref(), Some("kg"));
        assert_eq!(doc.fields[0].units, vec!["kg".to_string(), "t".to_string()]);
        assert_eq!(doc.fields[0].rule, Some(FieldRule::NonNegative));
        // Unpositioned fields fall back to label order.
        assert_eq!(doc.fields[1].label, "Alpha");
        assert_eq!(doc.fields[2].label, "Zulu");
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_form_json("{not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse form JSON"));
    }

    #[test]
    fn written_form_round_trips_with_timestamp() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("audit.json");

        let mut field = FieldRecord::new("Mass".into(), FieldKind::Number, true);
        field.value = Some(FieldValue::Number(12.5));
        field.unit = Some("kg".into());
        field.notes = Some("weighed twice".into());

        write_form(&output, "Site audit", std::slice::from_ref(&field)).unwrap();

        let doc = parse_form_json(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(doc.title, "Site audit");
        assert!(doc.saved_at.is_some());
        assert_eq!(doc.fields, vec![field]);
    }

    #[test]
    fn suggested_name_sanitizes_title() {
        assert_eq!(suggested_form_name("Ångström Site 2026"), "angstrom_site_2026.json");
        assert_eq!(suggested_form_name("  "), "field_form.json");
    }

    #[test]
    fn ensure_extension_preserves_matching_extension_case_insensitive() {
        let path = PathBuf::from("/tmp/report.JSON");
        assert_eq!(ensure_extension(path.clone(), "json"), path);
    }

    #[test]
    fn ensure_extension_replaces_unmatched_extension() {
        let path = PathBuf::from("/tmp/report.txt");
        assert_eq!(
            ensure_extension(path, "json"),
            PathBuf::from("/tmp/report.json")
        );
    }
}
