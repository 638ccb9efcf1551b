// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Field records and value validation. Validation is kept pure so it can
//! be reused by the editor UI and by form export checks.

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Error message for a missing required value.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// A committed field value. An unset field carries `None` on the record
/// rather than an empty variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl FieldValue {
    /// Render the value as the plain text shown in an edit buffer.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::List(items) => items.join(", "),
        }
    }
}

/// Whether a value counts as "filled in" for required-field checks.
///
/// This is the single source of truth for presence, used both by
/// validation and by the auto-save guard against no-op commits.
pub fn has_field_value(value: Option<&FieldValue>) -> bool {
    match value {
        None => false,
        Some(FieldValue::Text(s)) => !s.trim().is_empty(),
        Some(FieldValue::Number(n)) => n.is_finite(),
        Some(FieldValue::List(items)) => !items.is_empty(),
    }
}

/// Field kinds we know how to edit and validate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    List,
    Url,
    Email,
}

impl FieldKind {
    /// Label used in the add-field dialog.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::List => "List",
            Self::Url => "URL",
            Self::Email => "Email",
        }
    }

    /// Hint text for an empty edit buffer.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::List => "Comma-separated values",
            Self::Url => "https://example.com",
            Self::Email => "name@example.com",
            Self::Text => "",
        }
    }

    pub const ALL: [FieldKind; 5] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::List,
        FieldKind::Url,
        FieldKind::Email,
    ];
}

/// Declarative validation rule evaluated against a present value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    Positive,
    NonNegative,
    Integer,
    MaxLength { limit: usize },
}

impl FieldRule {
    /// Evaluate the rule. Text values are parsed where a numeric rule
    /// needs a number; unparsable text fails the rule.
    pub fn check(&self, value: &FieldValue) -> bool {
        match self {
            Self::Positive => numeric(value).is_some_and(|n| n > 0.0),
            Self::NonNegative => numeric(value).is_some_and(|n| n >= 0.0),
            Self::Integer => numeric(value).is_some_and(|n| n.fract() == 0.0),
            Self::MaxLength { limit } => match value {
                FieldValue::Text(s) => s.chars().count() <= *limit,
                FieldValue::List(items) => items.len() <= *limit,
                FieldValue::Number(_) => true,
            },
        }
    }

    /// Message shown when the record carries no custom one.
    pub fn default_message(&self) -> String {
        match self {
            Self::Positive => "Must be positive".to_string(),
            Self::NonNegative => "Must be zero or greater".to_string(),
            Self::Integer => "Must be a whole number".to_string(),
            Self::MaxLength { limit } => format!("Must be at most {limit} entries or characters"),
        }
    }
}

fn numeric(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        FieldValue::List(_) => None,
    }
}

/// One form field: definition plus committed value. Owned by the form,
/// never mutated by the editor directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<FieldRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl FieldRecord {
    /// Blank record for a freshly added field.
    pub fn new(label: String, kind: FieldKind, required: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            kind,
            value: None,
            unit: None,
            units: Vec::new(),
            notes: None,
            required,
            rule: None,
            validation_message: None,
            position: None,
        }
    }

    /// Sort helper: position first, then label.
    pub fn cmp_key(&self) -> (i32, &str) {
        (self.position.unwrap_or(i32::MAX), &self.label)
    }

    fn rule_message(&self, rule: &FieldRule) -> String {
        self.validation_message
            .clone()
            .unwrap_or_else(|| rule.default_message())
    }
}

/// Validate a proposed value against the record's requirements.
///
/// Checks run in order: presence (for required fields), kind-specific
/// format, then the record's declarative rule. The returned message is
/// suitable for inline display next to the field.
pub fn validate_value(record: &FieldRecord, value: Option<&FieldValue>) -> Result<(), String> {
    if !has_field_value(value) {
        if record.required {
            return Err(REQUIRED_MESSAGE.to_string());
        }
        return Ok(());
    }
    let Some(value) = value else {
        return Ok(());
    };

    match record.kind {
        FieldKind::Url => {
            let ok = Url::parse(value.display_text().trim())
                .ok()
                .is_some_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some());
            if !ok {
                return Err("Must be a valid http/https URL".to_string());
            }
        }
        FieldKind::Email => {
            if EmailAddress::parse_with_options(value.display_text().trim(), Default::default())
                .is_err()
            {
                return Err("Must be a valid email address".to_string());
            }
        }
        FieldKind::Number => {
            if numeric(value).is_none() {
                return Err("Must be a valid number".to_string());
            }
        }
        FieldKind::Text | FieldKind::List => {}
    }

    if let Some(rule) = &record.rule
        && !rule.check(value)
    {
        return Err(record.rule_message(rule));
    }

    Ok(())
}

/// Interpret a raw edit buffer as a typed value for the given kind.
///
/// Blank buffers become `None`. Number buffers that do not parse stay as
/// text so validation can report them instead of silently dropping input.
pub fn parse_draft(kind: FieldKind, raw: &str) -> Option<FieldValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match kind {
        FieldKind::Number => Some(
            trimmed
                .parse::<f64>()
                .map(FieldValue::Number)
                .unwrap_or_else(|_| FieldValue::Text(raw.to_string())),
        ),
        FieldKind::List => Some(FieldValue::List(split_list(raw))),
        _ => Some(FieldValue::Text(raw.to_string())),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
