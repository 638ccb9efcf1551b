// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Field editor component: one instance per form field.
//!
//! The editor owns only transient draft state. The field record stays
//! authoritative with the caller; every save is proposed as a
//! [`FieldCommit`] that the caller applies (or drops). While no draft
//! mode is active the editor is a pure view over the record.

use std::time::{Duration, Instant};

use eframe::egui;

use crate::debounce::Debounced;
use crate::models::field::{
    FieldRecord, FieldValue, has_field_value, parse_draft, validate_value,
};

/// Auto-save behavior for a field editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    pub auto_save: bool,
    pub auto_save_delay: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            auto_save: false,
            auto_save_delay: Duration::from_millis(600),
        }
    }
}

/// Draft state while the value and unit are being edited.
///
/// The debouncers start empty: the seed copied from the record never
/// enters them, so auto-save cannot fire before the user actually types.
#[derive(Clone, Debug)]
pub struct EditDraft {
    pub value: String,
    pub unit: Option<String>,
    debounced_value: Debounced<String>,
    debounced_unit: Debounced<String>,
}

impl EditDraft {
    fn seeded(record: &FieldRecord, delay: Duration) -> Self {
        Self {
            value: record
                .value
                .as_ref()
                .map(FieldValue::display_text)
                .unwrap_or_default(),
            unit: record.unit.clone(),
            debounced_value: Debounced::new(delay),
            debounced_unit: Debounced::new(delay),
        }
    }
}

/// Mutually exclusive editor modes. Drafts exist only inside their mode,
/// so leaving a mode drops its draft (and any pending debounce) with it.
#[derive(Clone, Debug, Default)]
pub enum EditorMode {
    #[default]
    Viewing,
    Editing(EditDraft),
    Notes {
        draft: String,
    },
    Deleting,
}

/// Transient editor state for a single field.
#[derive(Clone, Debug, Default)]
pub struct FieldEditorModel {
    mode: EditorMode,
    error: Option<String>,
    config: EditorConfig,
}

impl FieldEditorModel {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            mode: EditorMode::Viewing,
            error: None,
            config,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Last validation failure, cleared on value edits and on commit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    /// Value as the view should show it: the draft while editing, the
    /// committed value otherwise.
    pub fn effective_value(&self, record: &FieldRecord) -> Option<FieldValue> {
        match &self.mode {
            EditorMode::Editing(draft) => parse_draft(record.kind, &draft.value),
            _ => record.value.clone(),
        }
    }

    pub fn effective_unit(&self, record: &FieldRecord) -> Option<String> {
        match &self.mode {
            EditorMode::Editing(draft) => draft.unit.clone(),
            _ => record.unit.clone(),
        }
    }

    pub fn effective_notes(&self, record: &FieldRecord) -> Option<String> {
        match &self.mode {
            EditorMode::Notes { draft } => Some(draft.clone()),
            _ => record.notes.clone(),
        }
    }

    /// Live validity of the effective value. `None` while the value is
    /// absent, so unfilled optional fields show no verdict at all.
    pub fn validation_status(&self, record: &FieldRecord) -> Option<ValidationStatus> {
        let value = self.effective_value(record);
        if !has_field_value(value.as_ref()) && !record.required {
            return None;
        }
        match validate_value(record, value.as_ref()) {
            Ok(()) => Some(ValidationStatus::Valid),
            Err(message) => Some(ValidationStatus::Invalid(message)),
        }
    }
}

/// Live validity shown next to the field while typing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationStatus {
    Valid,
    Invalid(String),
}

/// Messages produced by the field editor view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldEditorMsg {
    StartEdit,
    /// Re-entrant toggle: opens the notes draft or drops it.
    ToggleNotes,
    /// Re-entrant toggle for the delete confirmation affordance.
    ToggleDelete,
    ValueChanged(String),
    UnitChanged(String),
    NotesChanged(String),
    Save,
    SaveNotes,
    Cancel,
    /// Confirms the delete affordance; the field's owner performs the
    /// actual removal.
    ConfirmDelete,
}

/// A proposed change to the caller-owned record.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldCommit {
    pub value: Option<FieldValue>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

/// Apply a message against the caller's current record. Returns a commit
/// when the message results in a save; the caller applies it to the
/// record and handles persistence.
pub fn update(
    model: &mut FieldEditorModel,
    record: &FieldRecord,
    msg: FieldEditorMsg,
    now: Instant,
) -> Option<FieldCommit> {
    match msg {
        FieldEditorMsg::StartEdit => {
            model.error = None;
            model.mode = EditorMode::Editing(EditDraft::seeded(
                record,
                model.config.auto_save_delay,
            ));
            None
        }
        FieldEditorMsg::ToggleNotes => {
            model.mode = match model.mode {
                EditorMode::Notes { .. } => EditorMode::Viewing,
                _ => EditorMode::Notes {
                    draft: record.notes.clone().unwrap_or_default(),
                },
            };
            None
        }
        FieldEditorMsg::ToggleDelete => {
            model.mode = match model.mode {
                EditorMode::Deleting => EditorMode::Viewing,
                _ => EditorMode::Deleting,
            };
            None
        }
        FieldEditorMsg::ValueChanged(text) => {
            if let EditorMode::Editing(draft) = &mut model.mode {
                draft.value = text.clone();
                if model.config.auto_save {
                    draft.debounced_value.set(text, now);
                }
                model.error = None;
            }
            None
        }
        FieldEditorMsg::UnitChanged(unit) => {
            if let EditorMode::Editing(draft) = &mut model.mode {
                draft.unit = Some(unit.clone());
                if model.config.auto_save {
                    draft.debounced_unit.set(unit, now);
                }
            }
            None
        }
        FieldEditorMsg::NotesChanged(text) => {
            if let EditorMode::Notes { draft } = &mut model.mode {
                *draft = text;
            }
            None
        }
        FieldEditorMsg::Save => save(model, record),
        FieldEditorMsg::SaveNotes => {
            let EditorMode::Notes { draft } = &model.mode else {
                return None;
            };
            // Notes commit independently of value and unit.
            let commit = FieldCommit {
                value: record.value.clone(),
                unit: record.unit.clone(),
                notes: Some(draft.clone()),
            };
            model.mode = EditorMode::Viewing;
            Some(commit)
        }
        FieldEditorMsg::Cancel => {
            // Dropping the mode drops its draft and pending debounce, so
            // a stale auto-save can never fire after cancellation.
            model.mode = EditorMode::Viewing;
            model.error = None;
            None
        }
        FieldEditorMsg::ConfirmDelete => {
            model.mode = EditorMode::Viewing;
            None
        }
    }
}

fn save(model: &mut FieldEditorModel, record: &FieldRecord) -> Option<FieldCommit> {
    let EditorMode::Editing(draft) = &model.mode else {
        return None;
    };
    let value = parse_draft(record.kind, &draft.value);
    if let Err(message) = validate_value(record, value.as_ref()) {
        model.error = Some(message);
        return None;
    }
    let commit = FieldCommit {
        value,
        unit: draft.unit.clone(),
        notes: record.notes.clone(),
    };
    model.error = None;
    model.mode = EditorMode::Viewing;
    Some(commit)
}

/// Per-frame auto-save pass.
///
/// Emits a commit only while editing, only when the draft is not failing
/// validation, and only when a debounced draft settles on a value that
/// differs from the committed record. The editor stays in editing mode;
/// auto-save is a background sync, not a transition.
pub fn tick(
    model: &mut FieldEditorModel,
    record: &FieldRecord,
    now: Instant,
) -> Option<FieldCommit> {
    if !model.config.auto_save {
        return None;
    }
    if !matches!(model.mode, EditorMode::Editing(_)) {
        return None;
    }
    let invalid = matches!(
        model.validation_status(record),
        Some(ValidationStatus::Invalid(_))
    );
    let EditorMode::Editing(draft) = &mut model.mode else {
        return None;
    };

    // Polling even while invalid consumes the settled entry, so a
    // lingering invalid draft leaves no elapsed deadline behind for the
    // repaint scheduler to spin on.
    let settled_value = draft.debounced_value.poll(now);
    let settled_unit = draft.debounced_unit.poll(now);
    if invalid || (settled_value.is_none() && settled_unit.is_none()) {
        return None;
    }

    let committed_text = record
        .value
        .as_ref()
        .map(FieldValue::display_text)
        .unwrap_or_default();
    let value_changed = settled_value.is_some_and(|v| v != committed_text);
    let unit_changed =
        settled_unit.is_some_and(|u| Some(u.as_str()) != record.unit.as_deref());
    if !value_changed && !unit_changed {
        return None;
    }

    Some(FieldCommit {
        value: parse_draft(record.kind, &draft.value),
        unit: draft.unit.clone(),
        notes: record.notes.clone(),
    })
}

/// Earliest pending auto-save deadline, for scheduling a repaint.
pub fn next_deadline(model: &FieldEditorModel) -> Option<Instant> {
    let EditorMode::Editing(draft) = &model.mode else {
        return None;
    };
    [
        draft.debounced_value.deadline(),
        draft.debounced_unit.deadline(),
    ]
    .into_iter()
    .flatten()
    .min()
}

/// Render one field and return the messages triggered by interaction.
pub fn view(
    ui: &mut egui::Ui,
    model: &FieldEditorModel,
    record: &FieldRecord,
) -> Vec<FieldEditorMsg> {
    let mut msgs = Vec::new();

    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            let mut label = record.label.clone();
            if record.required {
                label.push_str(" *");
            }
            ui.label(egui::RichText::new(label).strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                render_mode_buttons(ui, model, &mut msgs);
            });
        });
        ui.add_space(4.0);

        match model.mode() {
            EditorMode::Viewing => render_viewing(ui, record),
            EditorMode::Editing(draft) => {
                render_editing(ui, model, record, draft, &mut msgs)
            }
            EditorMode::Notes { draft } => render_notes(ui, draft, &mut msgs),
            EditorMode::Deleting => render_deleting(ui, &mut msgs),
        }
    });

    msgs
}

fn render_mode_buttons(
    ui: &mut egui::Ui,
    model: &FieldEditorModel,
    msgs: &mut Vec<FieldEditorMsg>,
) {
    if ui
        .button(egui_phosphor::regular::TRASH)
        .on_hover_text("Remove field")
        .clicked()
    {
        msgs.push(FieldEditorMsg::ToggleDelete);
    }
    let notes_button = egui::Button::new(egui_phosphor::regular::NOTE_PENCIL)
        .selected(matches!(model.mode(), EditorMode::Notes { .. }));
    if ui.add(notes_button).on_hover_text("Notes").clicked() {
        msgs.push(FieldEditorMsg::ToggleNotes);
    }
    if ui
        .button(egui_phosphor::regular::PENCIL_SIMPLE)
        .on_hover_text("Edit value")
        .clicked()
    {
        msgs.push(FieldEditorMsg::StartEdit);
    }
}

fn render_viewing(ui: &mut egui::Ui, record: &FieldRecord) {
    ui.horizontal(|ui| {
        match &record.value {
            Some(value) => {
                ui.label(value.display_text());
                if let Some(unit) = &record.unit {
                    ui.label(
                        egui::RichText::new(unit).color(egui::Color32::from_gray(120)),
                    );
                }
            }
            None => {
                ui.label(
                    egui::RichText::new("Not set")
                        .italics()
                        .color(egui::Color32::from_gray(110)),
                );
            }
        };
    });
    if let Some(notes) = &record.notes
        && !notes.trim().is_empty()
    {
        ui.label(
            egui::RichText::new(notes)
                .small()
                .color(egui::Color32::from_gray(120)),
        );
    }
}

fn render_editing(
    ui: &mut egui::Ui,
    model: &FieldEditorModel,
    record: &FieldRecord,
    draft: &EditDraft,
    msgs: &mut Vec<FieldEditorMsg>,
) {
    ui.horizontal(|ui| {
        let mut value = draft.value.clone();
        if ui
            .add(egui::TextEdit::singleline(&mut value).hint_text(record.kind.hint()))
            .changed()
        {
            msgs.push(FieldEditorMsg::ValueChanged(value));
        }

        if record.units.is_empty() {
            let mut unit = draft.unit.clone().unwrap_or_default();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut unit)
                        .hint_text("Unit")
                        .desired_width(70.0),
                )
                .changed()
            {
                msgs.push(FieldEditorMsg::UnitChanged(unit));
            }
        } else {
            let current = draft.unit.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt(("field-unit", record.id))
                .width(90.0)
                .selected_text(if current.is_empty() { "Unit" } else { &current })
                .show_ui(ui, |ui| {
                    for unit in &record.units {
                        let mut chosen = current.clone();
                        if ui
                            .selectable_value(&mut chosen, unit.clone(), unit)
                            .clicked()
                        {
                            msgs.push(FieldEditorMsg::UnitChanged(unit.clone()));
                        }
                    }
                });
        }

        if ui
            .button(format!("{} Save", egui_phosphor::regular::CHECK))
            .clicked()
        {
            msgs.push(FieldEditorMsg::Save);
        }
        if ui.button(egui_phosphor::regular::X).clicked() {
            msgs.push(FieldEditorMsg::Cancel);
        }
    });

    if let Some(error) = model.error() {
        ui.label(egui::RichText::new(error).small().color(egui::Color32::RED));
    } else if let Some(ValidationStatus::Invalid(message)) = model.validation_status(record) {
        ui.label(
            egui::RichText::new(message)
                .small()
                .color(egui::Color32::from_rgb(200, 120, 0)),
        );
    }
}

fn render_notes(ui: &mut egui::Ui, draft: &str, msgs: &mut Vec<FieldEditorMsg>) {
    let mut text = draft.to_string();
    if ui
        .add(
            egui::TextEdit::multiline(&mut text)
                .hint_text("Notes for this field")
                .desired_rows(3),
        )
        .changed()
    {
        msgs.push(FieldEditorMsg::NotesChanged(text));
    }
    ui.horizontal(|ui| {
        if ui
            .button(format!("{} Save notes", egui_phosphor::regular::CHECK))
            .clicked()
        {
            msgs.push(FieldEditorMsg::SaveNotes);
        }
        if ui.button(egui_phosphor::regular::X).clicked() {
            msgs.push(FieldEditorMsg::Cancel);
        }
    });
}

fn render_deleting(ui: &mut egui::Ui, msgs: &mut Vec<FieldEditorMsg>) {
    ui.horizontal(|ui| {
        ui.label("Remove this field?");
        if ui
            .button(format!("{} Remove", egui_phosphor::regular::TRASH))
            .clicked()
        {
            msgs.push(FieldEditorMsg::ConfirmDelete);
        }
        if ui.button("Keep").clicked() {
            msgs.push(FieldEditorMsg::ToggleDelete);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::{FieldKind, FieldRule, REQUIRED_MESSAGE};

    const DELAY: Duration = Duration::from_millis(100);

    fn record() -> FieldRecord {
        let mut rec = FieldRecord::new("Mass".into(), FieldKind::Text, false);
        rec.value = Some(FieldValue::Text("old".into()));
        rec.unit = Some("kg".into());
        rec.notes = Some("weighed twice".into());
        rec
    }

    fn auto_save_model() -> FieldEditorModel {
        FieldEditorModel::new(EditorConfig {
            auto_save: true,
            auto_save_delay: DELAY,
        })
    }

    fn apply(commit: FieldCommit, rec: &mut FieldRecord) {
        rec.value = commit.value;
        rec.unit = commit.unit;
        rec.notes = commit.notes;
    }

    #[test]
    fn start_edit_seeds_draft_from_record() {
        let rec = record();
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        assert!(update(&mut model, &rec, FieldEditorMsg::StartEdit, now).is_none());

        let EditorMode::Editing(draft) = model.mode() else {
            panic!("expected editing mode");
        };
        assert_eq!(draft.value, "old");
        assert_eq!(draft.unit.as_deref(), Some("kg"));
        assert!(model.error().is_none());
    }

    #[test]
    fn save_with_missing_required_value_sets_error_and_stays_editing() {
        let mut rec = FieldRecord::new("Site".into(), FieldKind::Text, true);
        rec.value = None;
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, now);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged(String::new()),
            now,
        );
        let commit = update(&mut model, &rec, FieldEditorMsg::Save, now);

        assert!(commit.is_none());
        assert!(matches!(model.mode(), EditorMode::Editing(_)));
        assert_eq!(model.error(), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn save_with_valid_value_commits_once_and_returns_to_viewing() {
        let rec = record();
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, now);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("new value".into()),
            now,
        );
        let commit = update(&mut model, &rec, FieldEditorMsg::Save, now)
            .expect("valid save should commit");

        assert_eq!(commit.value, Some(FieldValue::Text("new value".into())));
        assert_eq!(commit.unit.as_deref(), Some("kg"));
        assert_eq!(commit.notes.as_deref(), Some("weighed twice"));
        assert!(matches!(model.mode(), EditorMode::Viewing));
        assert!(model.error().is_none());
    }

    #[test]
    fn rule_violation_surfaces_custom_message() {
        let mut rec = FieldRecord::new("Density".into(), FieldKind::Number, false);
        rec.rule = Some(FieldRule::Positive);
        rec.validation_message = Some("Must be positive".into());
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, now);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("-5".into()),
            now,
        );
        let commit = update(&mut model, &rec, FieldEditorMsg::Save, now);

        assert!(commit.is_none());
        assert_eq!(model.error(), Some("Must be positive"));
    }

    #[test]
    fn cancel_from_any_mode_clears_state_without_commit() {
        let rec = record();
        let now = Instant::now();

        for opener in [
            FieldEditorMsg::StartEdit,
            FieldEditorMsg::ToggleNotes,
            FieldEditorMsg::ToggleDelete,
        ] {
            let mut model = FieldEditorModel::default();
            update(&mut model, &rec, opener, now);
            let commit = update(&mut model, &rec, FieldEditorMsg::Cancel, now);

            assert!(commit.is_none());
            assert!(matches!(model.mode(), EditorMode::Viewing));
            assert!(model.error().is_none());
        }
    }

    #[test]
    fn notes_toggle_is_reentrant() {
        let rec = record();
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::ToggleNotes, now);
        let EditorMode::Notes { draft } = model.mode() else {
            panic!("expected notes mode");
        };
        assert_eq!(draft, "weighed twice");

        update(&mut model, &rec, FieldEditorMsg::ToggleNotes, now);
        assert!(matches!(model.mode(), EditorMode::Viewing));
    }

    #[test]
    fn notes_save_commits_notes_with_existing_value_and_unit() {
        let rec = record();
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::ToggleNotes, now);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::NotesChanged("hello".into()),
            now,
        );
        let commit = update(&mut model, &rec, FieldEditorMsg::SaveNotes, now)
            .expect("notes save should commit");

        assert_eq!(commit.value, rec.value);
        assert_eq!(commit.unit, rec.unit);
        assert_eq!(commit.notes.as_deref(), Some("hello"));
        assert!(matches!(model.mode(), EditorMode::Viewing));
    }

    #[test]
    fn delete_toggle_reveals_and_hides_confirmation() {
        let rec = record();
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::ToggleDelete, now);
        assert!(matches!(model.mode(), EditorMode::Deleting));
        update(&mut model, &rec, FieldEditorMsg::ToggleDelete, now);
        assert!(matches!(model.mode(), EditorMode::Viewing));
    }

    #[test]
    fn effective_value_gates_on_mode() {
        let rec = record();
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        assert_eq!(
            model.effective_value(&rec),
            Some(FieldValue::Text("old".into()))
        );

        update(&mut model, &rec, FieldEditorMsg::StartEdit, now);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("draft".into()),
            now,
        );
        assert_eq!(
            model.effective_value(&rec),
            Some(FieldValue::Text("draft".into()))
        );
        // The record itself is untouched.
        assert_eq!(rec.value, Some(FieldValue::Text("old".into())));
    }

    #[test]
    fn validation_status_is_live_while_typing() {
        let mut rec = FieldRecord::new("Density".into(), FieldKind::Number, false);
        rec.rule = Some(FieldRule::Positive);
        let mut model = FieldEditorModel::default();
        let now = Instant::now();

        assert_eq!(model.validation_status(&rec), None);

        update(&mut model, &rec, FieldEditorMsg::StartEdit, now);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("-1".into()),
            now,
        );
        assert!(matches!(
            model.validation_status(&rec),
            Some(ValidationStatus::Invalid(_))
        ));

        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("3".into()),
            now,
        );
        assert_eq!(model.validation_status(&rec), Some(ValidationStatus::Valid));
    }

    #[test]
    fn required_field_reports_required_while_draft_is_empty() {
        let mut rec = FieldRecord::new("Site".into(), FieldKind::Text, true);
        rec.value = Some(FieldValue::Text("north depot".into()));
        let mut model = auto_save_model();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged(String::new()),
            t0,
        );

        assert_eq!(
            model.validation_status(&rec),
            Some(ValidationStatus::Invalid(REQUIRED_MESSAGE.to_string()))
        );
        // Emptying a required field never auto-saves over the committed
        // value.
        assert!(tick(&mut model, &rec, t0 + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn auto_save_fires_once_after_delay_and_stays_editing() {
        let mut rec = record();
        let mut model = auto_save_model();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("42".into()),
            t0,
        );

        assert!(tick(&mut model, &rec, t0 + Duration::from_millis(50)).is_none());

        let commit = tick(&mut model, &rec, t0 + DELAY).expect("debounced change should commit");
        assert_eq!(commit.value, Some(FieldValue::Text("42".into())));
        apply(commit, &mut rec);

        // Still editing, and the settled value does not re-fire.
        assert!(matches!(model.mode(), EditorMode::Editing(_)));
        assert!(tick(&mut model, &rec, t0 + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn auto_save_ignores_the_seed() {
        let rec = record();
        let mut model = auto_save_model();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        assert!(tick(&mut model, &rec, t0 + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn auto_save_skips_reverts_to_the_committed_value() {
        let rec = record();
        let mut model = auto_save_model();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("42".into()),
            t0,
        );
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("old".into()),
            t0 + Duration::from_millis(50),
        );

        assert!(tick(&mut model, &rec, t0 + Duration::from_millis(500)).is_none());
    }

    #[test]
    fn auto_save_holds_while_draft_is_invalid() {
        let mut rec = FieldRecord::new("Density".into(), FieldKind::Number, false);
        rec.rule = Some(FieldRule::Positive);
        let mut model = auto_save_model();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("-2".into()),
            t0,
        );
        assert!(tick(&mut model, &rec, t0 + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn invalid_draft_consumes_settled_debounce() {
        let mut rec = FieldRecord::new("Density".into(), FieldKind::Number, false);
        rec.rule = Some(FieldRule::Positive);
        let mut model = auto_save_model();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("-2".into()),
            t0,
        );
        assert_eq!(next_deadline(&model), Some(t0 + DELAY));

        assert!(tick(&mut model, &rec, t0 + DELAY).is_none());
        // The settled entry is gone, so no elapsed deadline is left for
        // the repaint scheduler to spin on.
        assert!(next_deadline(&model).is_none());

        // Correcting the draft still auto-saves.
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("2".into()),
            t0 + DELAY,
        );
        let commit =
            tick(&mut model, &rec, t0 + DELAY * 2).expect("corrected draft should commit");
        assert_eq!(commit.value, Some(FieldValue::Number(2.0)));
    }

    #[test]
    fn auto_save_commits_unit_changes() {
        let rec = record();
        let mut model = auto_save_model();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        update(&mut model, &rec, FieldEditorMsg::UnitChanged("t".into()), t0);

        let commit = tick(&mut model, &rec, t0 + DELAY).expect("unit change should commit");
        assert_eq!(commit.unit.as_deref(), Some("t"));
        assert_eq!(commit.value, rec.value);
    }

    #[test]
    fn cancel_cancels_a_pending_auto_save() {
        let rec = record();
        let mut model = auto_save_model();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("42".into()),
            t0,
        );
        update(&mut model, &rec, FieldEditorMsg::Cancel, t0);

        assert!(tick(&mut model, &rec, t0 + Duration::from_secs(10)).is_none());
        assert!(next_deadline(&model).is_none());
    }

    #[test]
    fn next_deadline_tracks_pending_drafts() {
        let rec = record();
        let mut model = auto_save_model();
        let t0 = Instant::now();

        assert!(next_deadline(&model).is_none());
        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        assert!(next_deadline(&model).is_none());

        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("42".into()),
            t0,
        );
        assert_eq!(next_deadline(&model), Some(t0 + DELAY));
    }

    #[test]
    fn auto_save_disabled_never_ticks() {
        let rec = record();
        let mut model = FieldEditorModel::default();
        let t0 = Instant::now();

        update(&mut model, &rec, FieldEditorMsg::StartEdit, t0);
        update(
            &mut model,
            &rec,
            FieldEditorMsg::ValueChanged("42".into()),
            t0,
        );
        assert!(tick(&mut model, &rec, t0 + Duration::from_secs(10)).is_none());
        // Typing with auto-save off leaves no deadline to repaint for.
        assert!(next_deadline(&model).is_none());
    }
}
