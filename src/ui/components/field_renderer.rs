// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Maps a field kind to its egui control and reports interactions back.

use eframe::egui;

use crate::models::{FieldDescriptor, FieldKind, FieldOption, FieldValue};
use crate::ui::components::{datetime_picker, toggle_switch};

/// What the user did to a control during this frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldInteraction {
    Changed(FieldValue),
    Blurred,
}

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 60, 60);

/// Render label, control, help text and (touched) error for one field.
///
/// Text-like controls blur when they lose focus. Discrete controls (pickers,
/// toggles, option lists) have no focus of their own, so a change is followed
/// by a blur in the same frame.
pub fn render_field(
    ui: &mut egui::Ui,
    field: &FieldDescriptor,
    value: &FieldValue,
    error: Option<&str>,
    enabled: bool,
) -> Vec<FieldInteraction> {
    let mut out = Vec::new();
    let enabled = enabled && !field.disabled;

    ui.vertical(|ui| {
        let mut label = field.label.clone();
        if field.required {
            label.push_str(" *");
        }
        ui.label(egui::RichText::new(label).strong());
        ui.add_space(2.0);

        render_control(ui, field, value, enabled, &mut out);

        if let Some(help) = &field.help_text {
            ui.label(
                egui::RichText::new(help)
                    .small()
                    .color(egui::Color32::from_gray(120)),
            );
        }
        if let Some(err) = error {
            ui.label(
                egui::RichText::new(format!("{} {err}", egui_phosphor::regular::WARNING_CIRCLE))
                    .small()
                    .color(ERROR_COLOR),
            );
        }
    });

    out
}

fn render_control(
    ui: &mut egui::Ui,
    field: &FieldDescriptor,
    value: &FieldValue,
    enabled: bool,
    out: &mut Vec<FieldInteraction>,
) {
    match field.kind {
        FieldKind::Text
        | FieldKind::Email
        | FieldKind::Password
        | FieldKind::Number
        | FieldKind::Tel
        | FieldKind::Url => single_line(ui, field, value, enabled, out),
        FieldKind::Textarea => {
            let mut text = value.to_string();
            let resp = ui.add_enabled(
                enabled,
                egui::TextEdit::multiline(&mut text)
                    .desired_rows(field.rows.unwrap_or(3))
                    .desired_width(f32::INFINITY)
                    .hint_text(field.placeholder.as_deref().unwrap_or_default()),
            );
            text_events(resp, text, out);
        }
        FieldKind::Select => select(ui, field, value, enabled, out),
        FieldKind::Multiselect => multiselect(ui, field, value, enabled, out),
        FieldKind::Radio => radio(ui, field, value, enabled, out),
        FieldKind::Checkbox => {
            let mut checked = value.as_bool().unwrap_or(false);
            let caption = field.placeholder.as_deref().unwrap_or("Yes");
            if ui
                .add_enabled(enabled, egui::Checkbox::new(&mut checked, caption))
                .changed()
            {
                discrete_change(FieldValue::Bool(checked), out);
            }
        }
        FieldKind::Switch => {
            let mut on = value.as_bool().unwrap_or(false);
            let changed = ui
                .add_enabled_ui(enabled, |ui| {
                    ui.horizontal(|ui| toggle_switch(ui, &mut on).changed()).inner
                })
                .inner;
            if changed {
                discrete_change(FieldValue::Bool(on), out);
            }
        }
        FieldKind::Date => {
            if let Some(v) = datetime_picker::date_control(ui, &value.to_string(), enabled) {
                discrete_change(FieldValue::Text(v), out);
            }
        }
        FieldKind::Time => {
            if let Some(v) = datetime_picker::time_control(ui, &value.to_string(), enabled) {
                discrete_change(FieldValue::Text(v), out);
            }
        }
        FieldKind::Datetime => {
            if let Some(v) = datetime_picker::datetime_control(ui, &value.to_string(), enabled) {
                discrete_change(FieldValue::Text(v), out);
            }
        }
    }
}

fn single_line(
    ui: &mut egui::Ui,
    field: &FieldDescriptor,
    value: &FieldValue,
    enabled: bool,
    out: &mut Vec<FieldInteraction>,
) {
    // Number inputs stay text while typing so partial input like "1." survives.
    let mut text = value.to_string();
    let hint = field
        .placeholder
        .as_deref()
        .unwrap_or_else(|| field_hint(field.kind));
    let resp = ui.add_enabled(
        enabled,
        egui::TextEdit::singleline(&mut text)
            .password(field.kind == FieldKind::Password)
            .desired_width(f32::INFINITY)
            .hint_text(hint),
    );
    text_events(resp, text, out);
}

fn text_events(resp: egui::Response, text: String, out: &mut Vec<FieldInteraction>) {
    if resp.changed() {
        out.push(FieldInteraction::Changed(FieldValue::Text(text)));
    }
    if resp.lost_focus() {
        out.push(FieldInteraction::Blurred);
    }
}

fn discrete_change(value: FieldValue, out: &mut Vec<FieldInteraction>) {
    out.push(FieldInteraction::Changed(value));
    out.push(FieldInteraction::Blurred);
}

fn select(
    ui: &mut egui::Ui,
    field: &FieldDescriptor,
    value: &FieldValue,
    enabled: bool,
    out: &mut Vec<FieldInteraction>,
) {
    let current = value.to_string();
    let selected_text = match field.option_label(&current) {
        Some(label) => label.to_string(),
        None if field.options.is_empty() => "No options".to_string(),
        None => field
            .placeholder
            .clone()
            .unwrap_or_else(|| "Select…".to_string()),
    };

    ui.add_enabled_ui(enabled, |ui| {
        egui::ComboBox::from_id_salt(format!("select-{}", field.name))
            .width(ui.available_width())
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                let mut choice = current.clone();
                for opt in &field.options {
                    if option_enabled(ui, opt, |ui| {
                        ui.selectable_value(&mut choice, opt.value.clone(), &opt.label)
                    })
                    .clicked()
                        && choice != current
                    {
                        discrete_change(FieldValue::Text(choice.clone()), out);
                    }
                }
            });
    });
}

fn multiselect(
    ui: &mut egui::Ui,
    field: &FieldDescriptor,
    value: &FieldValue,
    enabled: bool,
    out: &mut Vec<FieldInteraction>,
) {
    let chosen: Vec<String> = value.as_list().map(<[String]>::to_vec).unwrap_or_default();
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal_wrapped(|ui| {
            for opt in &field.options {
                let mut is_on = chosen.contains(&opt.value);
                if option_enabled(ui, opt, |ui| ui.checkbox(&mut is_on, &opt.label)).changed() {
                    // Keep schema option order in the stored list.
                    let next = field
                        .options
                        .iter()
                        .filter(|o| {
                            if o.value == opt.value {
                                is_on
                            } else {
                                chosen.contains(&o.value)
                            }
                        })
                        .map(|o| o.value.clone())
                        .collect::<Vec<_>>();
                    discrete_change(FieldValue::List(next), out);
                }
            }
        });
    });
}

fn radio(
    ui: &mut egui::Ui,
    field: &FieldDescriptor,
    value: &FieldValue,
    enabled: bool,
    out: &mut Vec<FieldInteraction>,
) {
    let current = value.to_string();
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal_wrapped(|ui| {
            let mut choice = current.clone();
            for opt in &field.options {
                if option_enabled(ui, opt, |ui| {
                    ui.radio_value(&mut choice, opt.value.clone(), &opt.label)
                })
                .clicked()
                    && choice != current
                {
                    discrete_change(FieldValue::Text(choice.clone()), out);
                }
            }
        });
    });
}

fn option_enabled(
    ui: &mut egui::Ui,
    opt: &FieldOption,
    add: impl FnOnce(&mut egui::Ui) -> egui::Response,
) -> egui::Response {
    ui.add_enabled_ui(!opt.disabled, add).inner
}

fn field_hint(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Url => "https://example.com",
        FieldKind::Email => "name@example.com",
        FieldKind::Tel => "+1 (555) 123-4567",
        FieldKind::Number => "Number",
        _ => "",
    }
}
