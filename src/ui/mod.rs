// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Fieldform contributors

//! Top-level egui application shell for filling in project field forms.
//! Handles layout, per-frame auto-save ticking, and wiring to form IO.

pub mod components;

use std::time::Instant;

use eframe::egui;

use crate::models::field::FieldKind;
use crate::models::form::{ensure_extension, suggested_form_name};
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::field_editor;

/// Stateful egui application for editing and exporting field forms.
pub struct FieldFormApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl Default for FieldFormApp {
    fn default() -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().min(2))
            .unwrap_or(1);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Self {
            model: AppModel::default(),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for FieldFormApp {
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        // All rendering happens in `update`, which the eframe runner still
        // calls before `ui` on every frame.
    }

    #[allow(deprecated)]
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        // Process pending messages until exhausted.
        let now = Instant::now();
        let mut msgs = std::mem::take(&mut self.inbox);
        while let Some(msg) = msgs.pop() {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, now, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }
        self.inbox = msgs;

        // Auto-save pass, then schedule a repaint for the next deadline so
        // pending debounces fire without user input.
        mvu::tick_editors(&mut self.model, now);
        if let Some(deadline) = mvu::next_tick_deadline(&self.model) {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Project fields");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                    ui.separator();
                    self.render_save_button(ui);
                    ui.separator();
                    self.render_auto_save_toggle(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);
        self.render_add_field_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_title_input(ui);
                ui.add_space(12.0);

                self.render_form_actions(ui);
                ui.add_space(12.0);

                self.render_fields(ui);
                ui.add_space(8.0);
            });
        });
    }
}

impl FieldFormApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Render the export button and handle the save-file dialog. Export is
    /// gated on a title and on every committed value passing validation.
    fn render_save_button(&mut self, ui: &mut egui::Ui) {
        let save_enabled = !self.model.project_title.trim().is_empty()
            && !self.model.has_invalid_fields();
        let button = egui::Button::new(format!(
            "{} Save form",
            egui_phosphor::regular::FLOPPY_DISK
        ));

        if ui
            .add_enabled(save_enabled, button)
            .on_disabled_hover_text("Please enter a title and fix required/invalid fields")
            .clicked()
        {
            let default_name = suggested_form_name(&self.model.project_title);
            let dialog = rfd::FileDialog::new()
                .set_title("Save form")
                .add_filter("JSON", &["json"])
                .set_file_name(&default_name);

            if let Some(path) = dialog.save_file() {
                let output_path = ensure_extension(path, "json");
                self.inbox.push(Msg::SaveRequested(output_path));
            } else {
                self.inbox.push(Msg::SaveCancelled);
            }
        }
    }

    fn render_auto_save_toggle(&mut self, ui: &mut egui::Ui) {
        let mut enabled = self.model.editor_config.auto_save;
        if ui
            .checkbox(&mut enabled, "Auto-save")
            .on_hover_text("Commit valid drafts automatically after a short pause")
            .changed()
        {
            self.inbox.push(Msg::AutoSaveToggled(enabled));
        }
    }

    /// Render the project title field.
    fn render_title_input(&mut self, ui: &mut egui::Ui) {
        ui.label("Project title");
        ui.add_space(4.0);
        let mut title = self.model.project_title.clone();
        if ui
            .add(
                egui::TextEdit::singleline(&mut title)
                    .hint_text("e.g., Northside depot waste audit"),
            )
            .changed()
        {
            self.inbox.push(Msg::ProjectTitleChanged(title));
        }
    }

    fn render_form_actions(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new(format!(
                    "{} Add field",
                    egui_phosphor::regular::PLUS
                )))
                .clicked()
            {
                self.inbox.push(Msg::StartAddField);
            }
            if ui
                .add(egui::Button::new(format!(
                    "{} Import form JSON",
                    egui_phosphor::regular::FILE_ARROW_DOWN
                )))
                .clicked()
            {
                self.inbox.push(Msg::ImportRequested);
            }
        });
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(
                "Import a form definition or add fields by hand; values are kept as drafts until saved.",
            )
            .small()
            .color(egui::Color32::from_gray(110)),
        );
    }

    fn render_fields(&mut self, ui: &mut egui::Ui) {
        if self.model.fields.is_empty() {
            ui.label(
                egui::RichText::new("No fields yet.")
                    .italics()
                    .color(egui::Color32::from_gray(110)),
            );
            return;
        }

        for (index, (record, editor)) in self
            .model
            .fields
            .iter()
            .zip(self.model.editors.iter())
            .enumerate()
        {
            let msgs = field_editor::view(ui, editor, record);
            self.inbox
                .extend(msgs.into_iter().map(|msg| Msg::Field { index, msg }));
            ui.add_space(6.0);
        }
    }

    /// Render the add-field dialog while a draft is open.
    fn render_add_field_modal(&mut self, ctx: &egui::Context) {
        let Some(draft) = self.model.adding.clone() else {
            return;
        };

        egui::Window::new("Add field")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                let mut label = draft.label.clone();
                if ui
                    .add(egui::TextEdit::singleline(&mut label).hint_text("Field label"))
                    .changed()
                {
                    self.inbox.push(Msg::AddFieldLabelChanged(label));
                }

                egui::ComboBox::from_label("Kind")
                    .selected_text(draft.kind.label())
                    .show_ui(ui, |ui| {
                        for kind in FieldKind::ALL {
                            let mut chosen = draft.kind;
                            if ui
                                .selectable_value(&mut chosen, kind, kind.label())
                                .clicked()
                            {
                                self.inbox.push(Msg::AddFieldKindChanged(kind));
                            }
                        }
                    });

                let mut required = draft.required;
                if ui.checkbox(&mut required, "Required").changed() {
                    self.inbox.push(Msg::AddFieldRequiredToggled(required));
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .button(format!("{} Add", egui_phosphor::regular::CHECK))
                        .clicked()
                    {
                        self.inbox.push(Msg::CommitAddField);
                    }
                    if ui.button("Cancel").clicked() {
                        self.inbox.push(Msg::CancelAddField);
                    }
                });
            });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Validation error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status/error message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            let display = if self.model.pending_commands > 0 {
                format!("{}  ({} working…)", text, self.model.pending_commands)
            } else {
                text.to_string()
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0))
                        .on_hover_text(format!(
                            "{} task(s) running in background",
                            self.model.pending_commands
                        ));
                }
            });
        }
    }
}
