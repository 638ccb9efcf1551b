// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Shared helper utilities reused by UI and persistence logic.

/// Produce a filesystem-safe file stem from a user-provided title.
///
/// Transliterates Unicode to ASCII with `deunicode`, maps everything
/// outside `[A-Za-z0-9-_]` to `_`, collapses underscore runs, and trims
/// leading/trailing underscores. Empty input falls back to `field_form`.
pub fn sanitize_file_stem(value: &str) -> String {
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len());
    let mut last_underscore = false;

    for ch in transliterated.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' {
            out.push(ch);
            last_underscore = false;
        } else if !last_underscore {
            out.push('_');
            last_underscore = true;
        }
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "field_form".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_file_stem;

    // Accents transliterate and separators collapse to single underscores.
    #[test]
    fn sanitize_transliterates_and_collapses() {
        assert_eq!(
            sanitize_file_stem("Ångström audit 2026/08/26"),
            "Angstrom_audit_2026_08_26"
        );
    }

    #[test]
    fn sanitize_trims_edge_underscores() {
        assert_eq!(sanitize_file_stem("  (draft)  "), "draft");
    }

    #[test]
    fn sanitize_falls_back_for_empty_input() {
        assert_eq!(sanitize_file_stem("!!!"), "field_form");
    }
}
