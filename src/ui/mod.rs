// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for the call-center desk.
//! Handles layout, the records views, and wiring to the store workers.

pub mod components;

use std::sync::Arc;

use eframe::egui;

use crate::logic::store::{Collection, Record, RecordStore};
use crate::models::FieldValue;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::form_dialog;

/// Columns shown in the records table: `(field name, header)`.
fn table_columns(collection: Collection) -> &'static [(&'static str, &'static str)] {
    match collection {
        Collection::Users => &[
            ("full_name", "Name"),
            ("email", "Email"),
            ("role", "Role"),
            ("country", "Country"),
            ("active", "Active"),
        ],
        Collection::Escalations => &[
            ("call_id", "Call"),
            ("priority", "Priority"),
            ("reasons", "Reasons"),
            ("follow_up_date", "Follow-up"),
        ],
    }
}

/// Stateful egui application driving the dashboard.
pub struct DeskApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl DeskApp {
    /// Spawn the store workers and queue the initial record loads.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, store.as_ref());
                    let _ = msg_tx.send(msg);
                }
            });
        }
        tracing::debug!(threads, "store workers started");

        let mut app = Self {
            model: AppModel::default(),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        };
        for collection in Collection::ALL {
            app.dispatch(Command::LoadRecords(collection));
        }
        app
    }

    fn dispatch(&mut self, cmd: Command) {
        if self.cmd_tx.send(cmd).is_ok() {
            self.model.pending_commands += 1;
        } else {
            tracing::error!("store workers are gone; command dropped");
        }
    }
}

impl eframe::App for DeskApp {
    /// Drives a single UI frame.
    ///
    /// Drains worker results into the inbox, applies every pending message to
    /// the MVU model (sending resulting commands to the workers), then renders
    /// the top bar, the error modal, the status bar, the slide-in dialog and
    /// the records view. Views push new messages for the next frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pull messages produced by the command workers.
        let mut received = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
            received = true;
        }

        let msgs = std::mem::take(&mut self.inbox);
        for msg in msgs {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                self.dispatch(cmd);
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(format!("{} Call-center desk", egui_phosphor::regular::HEADSET));
                ui.add_space(12.0);
                self.render_collection_tabs(ui);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                    ui.separator();
                    self.render_new_button(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        let dialog_msgs = form_dialog::view(ctx, &self.model.dialog);
        self.inbox.extend(dialog_msgs.into_iter().map(Msg::Dialog));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_records(ui);
            });
        });

        // Keep polling while the workers have something in flight.
        if received || self.model.pending_commands > 0 || !self.inbox.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl DeskApp {
    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Segmented buttons selecting the collection shown in the central panel.
    fn render_collection_tabs(&mut self, ui: &mut egui::Ui) {
        for collection in Collection::ALL {
            let tab = egui::Button::new(collection.title()).selected(self.model.active == collection);
            if ui.add(tab).clicked() && self.model.active != collection {
                self.inbox.push(Msg::SelectCollection(collection));
            }
        }
        if ui
            .button(egui_phosphor::regular::ARROWS_CLOCKWISE)
            .on_hover_text("Reload records")
            .clicked()
        {
            self.inbox.push(Msg::RefreshRequested);
        }
    }

    /// "New …" button; disabled while a save is in flight.
    fn render_new_button(&mut self, ui: &mut egui::Ui) {
        let label = match self.model.active {
            Collection::Users => "New user",
            Collection::Escalations => "New escalation",
        };
        let button = egui::Button::new(format!("{} {label}", egui_phosphor::regular::PLUS));
        if ui
            .add_enabled(!self.model.dialog.is_submitting(), button)
            .on_disabled_hover_text("A save is in progress")
            .clicked()
        {
            self.inbox.push(Msg::OpenCreate(self.model.active));
        }
    }

    fn render_records(&mut self, ui: &mut egui::Ui) {
        let collection = self.model.active;
        let records: Vec<Record> = self.model.records(collection).to_vec();

        ui.heading(collection.title());
        ui.add_space(6.0);

        if records.is_empty() {
            ui.label(
                egui::RichText::new("No records yet.")
                    .italics()
                    .color(egui::Color32::from_gray(110)),
            );
            return;
        }

        let columns = table_columns(collection);
        egui::Grid::new(("records_grid", collection.as_str()))
            .num_columns(columns.len() + 1)
            .striped(true)
            .spacing(egui::vec2(16.0, 6.0))
            .show(ui, |ui| {
                for (_, header) in columns {
                    ui.label(egui::RichText::new(*header).strong());
                }
                ui.label("");
                ui.end_row();

                for record in &records {
                    for (name, _) in columns {
                        let text = record
                            .values
                            .get(*name)
                            .map(FieldValue::to_string)
                            .unwrap_or_default();
                        ui.label(text);
                    }
                    let edit = ui
                        .add_enabled(
                            !self.model.dialog.is_submitting(),
                            egui::Button::new(egui_phosphor::regular::PENCIL_SIMPLE),
                        )
                        .on_hover_text("Edit");
                    if edit.clicked() {
                        self.inbox.push(Msg::OpenEdit {
                            collection,
                            id: record.id,
                        });
                    }
                    ui.end_row();
                }
            });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
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

    /// Render latest status message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        let pending = self.model.pending_commands;
        ui.horizontal(|ui| {
            if let Some(text) = &self.model.status {
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(68)));
            }
            if pending > 0 {
                ui.add(egui::Spinner::new().size(14.0))
                    .on_hover_text(format!("{pending} request(s) running in background"));
            }
        });
    }
}
