// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Slide-in form dialog: MVU wrapper around a [`DialogSession`] and its egui view.

use std::sync::Arc;

use eframe::egui;

use crate::logic::session::{DialogSession, SubmitOutcome, SubmitResolution};
use crate::logic::visibility::visible_fields;
use crate::models::{DialogSchema, FieldDescriptor, FieldValue, Values};
use crate::ui::components::field_renderer::{FieldInteraction, render_field};

/// Dialog state: `None` session means the dialog is closed.
#[derive(Clone, Default, Debug)]
pub struct FormDialogModel {
    session: Option<DialogSession>,
    loading: bool,
}

impl FormDialogModel {
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DialogSession> {
        self.session.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.session.as_ref().is_some_and(DialogSession::is_submitting)
    }

    /// External disable-all flag, from the caller or the schema config.
    pub fn is_loading(&self) -> bool {
        self.loading
            || self
                .session
                .as_ref()
                .is_some_and(|s| s.schema().config.loading)
    }
}

/// Messages produced by the dialog view or routed to it by the caller.
#[derive(Clone, Debug)]
pub enum FormDialogMsg {
    Open {
        schema: Arc<DialogSchema>,
        initial_values: Values,
    },
    FieldChanged {
        name: String,
        value: FieldValue,
    },
    FieldBlurred(String),
    SubmitRequested,
    CancelRequested,
    /// Header close control.
    DismissRequested,
    /// Result of the save command.
    SaveCompleted(Result<(), String>),
    DismissSubmitError,
    SetLoading(bool),
}

/// Side effects the caller has to run.
#[derive(Clone, Debug, PartialEq)]
pub enum FormDialogCommand {
    Save(Values),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    Cancelled,
    Saved,
    Dismissed,
}

/// Notifications for the caller (close callback, failure feedback).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormDialogEvent {
    Closed(CloseReason),
    SaveFailed(String),
}

/// Update the dialog model and enqueue commands.
pub fn update(
    model: &mut FormDialogModel,
    msg: FormDialogMsg,
    cmds: &mut Vec<FormDialogCommand>,
) -> Option<FormDialogEvent> {
    match msg {
        FormDialogMsg::Open {
            schema,
            initial_values,
        } => {
            if model.is_submitting() {
                tracing::warn!("open ignored while a save is in flight");
                return None;
            }
            model.session = Some(DialogSession::open(schema, &initial_values));
            None
        }
        FormDialogMsg::FieldChanged { name, value } => {
            if let Some(session) = model.session.as_mut() {
                session.change(&name, value);
            }
            None
        }
        FormDialogMsg::FieldBlurred(name) => {
            if let Some(session) = model.session.as_mut() {
                session.blur(&name);
            }
            None
        }
        FormDialogMsg::SubmitRequested => {
            let loading = model.is_loading();
            let session = model.session.as_mut()?;
            if loading {
                tracing::debug!("submit ignored while loading");
                return None;
            }
            match session.begin_submit() {
                SubmitOutcome::Dispatched(values) => cmds.push(FormDialogCommand::Save(values)),
                SubmitOutcome::Rejected(_) | SubmitOutcome::Ignored => {}
            }
            None
        }
        FormDialogMsg::CancelRequested => close(model, CloseReason::Cancelled),
        FormDialogMsg::DismissRequested => close(model, CloseReason::Dismissed),
        FormDialogMsg::SaveCompleted(result) => {
            let session = model.session.as_mut()?;
            let err = result.as_ref().err().cloned();
            match session.complete_submit(result) {
                SubmitResolution::Saved => {
                    model.session = None;
                    Some(FormDialogEvent::Closed(CloseReason::Saved))
                }
                SubmitResolution::Failed => err.map(FormDialogEvent::SaveFailed),
                SubmitResolution::Unexpected => None,
            }
        }
        FormDialogMsg::DismissSubmitError => {
            if let Some(session) = model.session.as_mut() {
                session.dismiss_submit_error();
            }
            None
        }
        FormDialogMsg::SetLoading(loading) => {
            model.loading = loading;
            None
        }
    }
}

fn close(model: &mut FormDialogModel, reason: CloseReason) -> Option<FormDialogEvent> {
    let session = model.session.as_ref()?;
    if !session.can_close() {
        tracing::debug!(?reason, "close ignored while submitting");
        return None;
    }
    if model.loading {
        tracing::debug!(?reason, "close ignored while loading");
        return None;
    }
    tracing::info!(dialog = %session.schema().config.title, ?reason, "dialog closed");
    model.session = None;
    Some(FormDialogEvent::Closed(reason))
}

/// A layout row: either one full-width field or up to `columns` regular fields.
fn layout_rows<'a>(
    fields: impl IntoIterator<Item = &'a FieldDescriptor>,
    columns: usize,
) -> Vec<Vec<&'a FieldDescriptor>> {
    let columns = columns.max(1);
    let mut rows: Vec<Vec<&FieldDescriptor>> = Vec::new();
    let mut current: Vec<&FieldDescriptor> = Vec::new();
    for field in fields {
        if field.full_width {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            rows.push(vec![field]);
            continue;
        }
        current.push(field);
        if current.len() == columns {
            rows.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

/// Render the slide-in panel and return triggered messages.
pub fn view(ctx: &egui::Context, model: &FormDialogModel) -> Vec<FormDialogMsg> {
    let mut msgs = Vec::new();
    let width = model
        .session
        .as_ref()
        .map(|s| s.schema().config.width)
        .unwrap_or(480.0);

    egui::SidePanel::right("form_dialog")
        .resizable(false)
        .exact_width(width)
        .show_animated(ctx, model.is_open(), |ui| {
            if let Some(session) = &model.session {
                render_dialog(ui, session, model.is_loading(), &mut msgs);
            }
        });

    msgs
}

fn render_dialog(
    ui: &mut egui::Ui,
    session: &DialogSession,
    loading: bool,
    msgs: &mut Vec<FormDialogMsg>,
) {
    let config = &session.schema().config;
    let submitting = session.is_submitting();

    render_header(ui, session, loading, msgs);

    egui::TopBottomPanel::bottom("form_dialog_footer")
        .resizable(false)
        .show_inside(ui, |ui| {
            ui.add_space(6.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let save = egui::Button::new(format!(
                    "{} {}",
                    egui_phosphor::regular::FLOPPY_DISK,
                    config.save_button_text
                ));
                if ui
                    .add_enabled(!submitting && !loading, save)
                    .on_disabled_hover_text("Please wait until the current operation finishes")
                    .clicked()
                {
                    msgs.push(FormDialogMsg::SubmitRequested);
                }
                if ui
                    .add_enabled(
                        !submitting && !loading,
                        egui::Button::new(config.cancel_button_text.as_str()),
                    )
                    .clicked()
                {
                    msgs.push(FormDialogMsg::CancelRequested);
                }
                if submitting || loading {
                    ui.add(egui::Spinner::new().size(14.0));
                }
            });
            ui.add_space(4.0);
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        if let Some(err) = session.submit_error() {
            render_error_banner(ui, err, msgs);
            ui.add_space(8.0);
        }

        let state = session.state();
        let values = state.values();
        let enabled = !submitting && !loading;
        let rows = layout_rows(visible_fields(session.fields(), values), config.grid_columns);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for row in rows {
                let columns = if row.len() == 1 && row[0].full_width {
                    1
                } else {
                    config.grid_columns.max(1)
                };
                ui.columns(columns, |cols| {
                    for (col, field) in cols.iter_mut().zip(row) {
                        col.push_id(&field.name, |ui| {
                            let value = values.get(&field.name).cloned().unwrap_or_default();
                            let error = state.visible_error(&field.name);
                            for interaction in render_field(ui, field, &value, error, enabled) {
                                msgs.push(match interaction {
                                    FieldInteraction::Changed(value) => {
                                        FormDialogMsg::FieldChanged {
                                            name: field.name.clone(),
                                            value,
                                        }
                                    }
                                    FieldInteraction::Blurred => {
                                        FormDialogMsg::FieldBlurred(field.name.clone())
                                    }
                                });
                            }
                        });
                    }
                });
                ui.add_space(10.0);
            }
        });
    });
}

fn render_header(
    ui: &mut egui::Ui,
    session: &DialogSession,
    loading: bool,
    msgs: &mut Vec<FormDialogMsg>,
) {
    let config = &session.schema().config;
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.heading(&config.title);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(
                    session.can_close() && !loading,
                    egui::Button::new(egui_phosphor::regular::X),
                )
                .on_hover_text("Close")
                .clicked()
            {
                msgs.push(FormDialogMsg::DismissRequested);
            }
        });
    });
    if let Some(subtitle) = &config.subtitle {
        ui.label(
            egui::RichText::new(subtitle)
                .small()
                .color(egui::Color32::from_gray(110)),
        );
    }
    ui.separator();
}

fn render_error_banner(ui: &mut egui::Ui, err: &str, msgs: &mut Vec<FormDialogMsg>) {
    egui::Frame::group(ui.style())
        .fill(egui::Color32::from_rgb(253, 236, 236))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} Could not save: {err}",
                        egui_phosphor::regular::WARNING
                    ))
                    .color(egui::Color32::from_rgb(160, 40, 40)),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button(egui_phosphor::regular::X).clicked() {
                        msgs.push(FormDialogMsg::DismissSubmitError);
                    }
                });
            });
        });
}
