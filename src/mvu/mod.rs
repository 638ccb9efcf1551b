// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Root Model-View-Update kernel wiring field editors, form import and
//! export, and background commands.

use std::path::PathBuf;
use std::time::Instant;

use crate::models::field::{FieldKind, FieldRecord, validate_value};
use crate::models::form::{FormDocument, parse_form_json, write_form};
use crate::ui::components::field_editor::{
    self, EditorConfig, FieldCommit, FieldEditorModel, FieldEditorMsg,
};

/// Top-level application state. `fields` is the authoritative form data;
/// `editors` holds one transient editor per field, index-aligned.
#[derive(Default)]
pub struct AppModel {
    /// User-facing project title, doubles as the form title on export.
    pub project_title: String,
    /// Auto-save settings applied to every field editor.
    pub editor_config: EditorConfig,
    /// Committed field records, owned here and only changed via commits.
    pub fields: Vec<FieldRecord>,
    /// Per-field editor state, index-aligned with `fields`.
    pub editors: Vec<FieldEditorModel>,
    /// Draft for the add-field dialog, `None` while closed.
    pub adding: Option<NewFieldDraft>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in the modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

/// Draft state for the add-field dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewFieldDraft {
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl AppModel {
    /// True when any committed value fails validation; gates export.
    pub fn has_invalid_fields(&self) -> bool {
        self.fields
            .iter()
            .any(|rec| validate_value(rec, rec.value.as_ref()).is_err())
    }

    fn push_field(&mut self, record: FieldRecord) {
        self.fields.push(record);
        self.editors
            .push(FieldEditorModel::new(self.editor_config));
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    ProjectTitleChanged(String),
    AutoSaveToggled(bool),
    Field {
        index: usize,
        msg: FieldEditorMsg,
    },
    StartAddField,
    AddFieldLabelChanged(String),
    AddFieldKindChanged(FieldKind),
    AddFieldRequiredToggled(bool),
    CommitAddField,
    CancelAddField,
    ImportRequested,
    ImportCancelled,
    ImportLoaded {
        doc: FormDocument,
        source: PathBuf,
    },
    ImportFailed(String),
    SaveRequested(PathBuf),
    SaveCancelled,
    SaveCompleted(Result<PathBuf, String>),
    DismissError,
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickFormFile,
    SaveForm(SavePayload),
}

/// Captured, validated data for export.
pub struct SavePayload {
    pub output: PathBuf,
    pub title: String,
    pub fields: Vec<FieldRecord>,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, now: Instant, cmds: &mut Vec<Command>) {
    match msg {
        Msg::ProjectTitleChanged(text) => model.project_title = text,
        Msg::AutoSaveToggled(enabled) => {
            model.editor_config.auto_save = enabled;
            for editor in &mut model.editors {
                editor.set_config(model.editor_config);
            }
        }
        Msg::Field { index, msg } => handle_field_msg(model, index, msg, now),
        Msg::StartAddField => model.adding = Some(NewFieldDraft::default()),
        Msg::AddFieldLabelChanged(label) => {
            if let Some(draft) = &mut model.adding {
                draft.label = label;
            }
        }
        Msg::AddFieldKindChanged(kind) => {
            if let Some(draft) = &mut model.adding {
                draft.kind = kind;
            }
        }
        Msg::AddFieldRequiredToggled(required) => {
            if let Some(draft) = &mut model.adding {
                draft.required = required;
            }
        }
        Msg::CommitAddField => {
            let Some(draft) = model.adding.clone() else {
                return;
            };
            let label = draft.label.trim().to_string();
            if label.is_empty() {
                surface_event(model, "Please enter a field label.".to_string(), true);
                return;
            }
            model.push_field(FieldRecord::new(label.clone(), draft.kind, draft.required));
            model.adding = None;
            surface_event(model, format!("Field '{label}' added."), false);
        }
        Msg::CancelAddField => model.adding = None,
        Msg::ImportRequested => cmds.push(Command::PickFormFile),
        Msg::ImportCancelled => {
            surface_event(model, "Form import cancelled.".to_string(), false);
        }
        Msg::ImportFailed(err) => surface_event(model, err, true),
        Msg::ImportLoaded { doc, source } => {
            model.project_title = doc.title;
            model.editors = doc
                .fields
                .iter()
                .map(|_| FieldEditorModel::new(model.editor_config))
                .collect();
            model.fields = doc.fields;
            model.adding = None;
            surface_event(
                model,
                format!(
                    "Imported {} field(s) from {}",
                    model.fields.len(),
                    source.display()
                ),
                false,
            );
        }
        Msg::SaveRequested(output) => match validate_for_save(model, output) {
            Ok(payload) => cmds.push(Command::SaveForm(payload)),
            Err(err) => surface_event(model, err, true),
        },
        Msg::SaveCancelled => surface_event(model, "Save cancelled.".to_string(), false),
        Msg::SaveCompleted(result) => match result {
            Ok(path) => {
                surface_event(model, format!("Form saved: {}", path.display()), false)
            }
            Err(err) => {
                surface_event(model, format!("Failed to save form:\n\n{err}"), true)
            }
        },
        Msg::DismissError => model.error = None,
    }
}

fn handle_field_msg(model: &mut AppModel, index: usize, msg: FieldEditorMsg, now: Instant) {
    if matches!(msg, FieldEditorMsg::ConfirmDelete) {
        if index < model.fields.len() {
            let label = model.fields[index].label.clone();
            model.fields.remove(index);
            model.editors.remove(index);
            surface_event(model, format!("Field '{label}' removed."), false);
        }
        return;
    }

    let (Some(record), Some(editor)) = (model.fields.get(index), model.editors.get_mut(index))
    else {
        return;
    };
    if let Some(commit) = field_editor::update(editor, record, msg, now) {
        let label = record.label.clone();
        apply_commit(&mut model.fields[index], commit);
        surface_event(model, format!("Saved '{label}'."), false);
    }
}

/// Run the per-frame auto-save pass over every editor. Returns whether
/// any commit was applied.
pub fn tick_editors(model: &mut AppModel, now: Instant) -> bool {
    let mut saved: Option<String> = None;
    for (record, editor) in model.fields.iter_mut().zip(model.editors.iter_mut()) {
        if let Some(commit) = field_editor::tick(editor, record, now) {
            let label = record.label.clone();
            apply_commit(record, commit);
            saved = Some(label);
        }
    }
    match saved {
        Some(label) => {
            model.status = Some(format!("Auto-saved '{label}'."));
            true
        }
        None => false,
    }
}

/// Earliest pending auto-save deadline across all editors.
pub fn next_tick_deadline(model: &AppModel) -> Option<Instant> {
    model
        .editors
        .iter()
        .filter_map(field_editor::next_deadline)
        .min()
}

fn apply_commit(record: &mut FieldRecord, commit: FieldCommit) {
    record.value = commit.value;
    record.unit = commit.unit;
    record.notes = commit.notes;
}

/// Execute a command synchronously and return the resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickFormFile => {
            let file = rfd::FileDialog::new()
                .set_title("Select form JSON")
                .add_filter("JSON", &["json"])
                .pick_file();

            match file {
                Some(path) => match std::fs::read_to_string(&path) {
                    Ok(content) => match parse_form_json(&content) {
                        Ok(doc) => Msg::ImportLoaded { doc, source: path },
                        Err(err) => Msg::ImportFailed(err.to_string()),
                    },
                    Err(err) => Msg::ImportFailed(format!("Failed to read form file: {err}")),
                },
                None => Msg::ImportCancelled,
            }
        }
        Command::SaveForm(payload) => {
            let res = write_form(&payload.output, &payload.title, &payload.fields)
                .map(|_| payload.output.clone());
            Msg::SaveCompleted(res.map_err(|e| e.to_string()))
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

/// Validate model state and build the payload required to export the form.
fn validate_for_save(model: &AppModel, output: PathBuf) -> Result<SavePayload, String> {
    let title = model.project_title.trim().to_string();
    if title.is_empty() {
        return Err("Please enter a project title.".into());
    }

    for record in &model.fields {
        if let Err(message) = validate_value(record, record.value.as_ref()) {
            return Err(format!("Field '{}': {}", record.label, message));
        }
    }

    Ok(SavePayload {
        output,
        title,
        fields: model.fields.clone(),
    })
}
