// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Date, time and date-time controls for form fields.
//! Values travel as HTML-style strings (`YYYY-MM-DD`, `HH:MM`, `YYYY-MM-DDTHH:MM`).

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use eframe::egui;
use egui_extras::DatePickerButton;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format an integer as a two-digit string (00-99).
fn format_two(n: i32) -> String {
    format!("{:02}", n.clamp(0, 99))
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), DATETIME_FORMAT).ok()
}

/// Build `HH:MM` from clamped parts.
pub fn time_string(hour: i32, minute: i32) -> String {
    format!(
        "{}:{}",
        format_two(hour.clamp(0, 23)),
        format_two(minute.clamp(0, 59))
    )
}

/// Date picker with a "clear" affordance. Returns the new value string.
pub fn date_control(ui: &mut egui::Ui, raw: &str, enabled: bool) -> Option<String> {
    let mut out = None;
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal(|ui| {
            let current = parse_date(raw);
            let mut date = current.unwrap_or_else(|| Local::now().date_naive());
            if ui
                .add(DatePickerButton::new(&mut date).show_icon(true))
                .changed()
            {
                out = Some(date.format(DATE_FORMAT).to_string());
            }
            if current.is_none() {
                ui.label(
                    egui::RichText::new("not set")
                        .small()
                        .italics()
                        .color(egui::Color32::from_gray(120)),
                );
            } else if ui
                .small_button(egui_phosphor::regular::X)
                .on_hover_text("Clear date")
                .clicked()
            {
                out = Some(String::new());
            }
        });
    });
    out
}

/// Hour/minute drag values plus a "Now" button.
pub fn time_control(ui: &mut egui::Ui, raw: &str, enabled: bool) -> Option<String> {
    let mut out = None;
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal(|ui| {
            let (hour, minute) = parse_time(raw)
                .map(|t| (t.hour() as i32, t.minute() as i32))
                .unwrap_or((0, 0));
            if let Some((h, m)) = hour_minute(ui, hour, minute) {
                out = Some(time_string(h, m));
            }
            if ui
                .small_button(egui_phosphor::regular::CLOCK)
                .on_hover_text("Set to your current local time")
                .clicked()
            {
                let now = Local::now();
                out = Some(time_string(now.hour() as i32, now.minute() as i32));
            }
        });
    });
    out
}

/// Date picker followed by hour/minute controls.
pub fn datetime_control(ui: &mut egui::Ui, raw: &str, enabled: bool) -> Option<String> {
    let mut out = None;
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal(|ui| {
            let current = parse_datetime(raw).unwrap_or_else(|| {
                let now = Local::now().naive_local();
                now.with_second(0).unwrap_or(now)
            });
            let mut date = current.date();
            let hour = current.hour() as i32;
            let minute = current.minute() as i32;

            let mut next_date = None;
            if ui
                .add(DatePickerButton::new(&mut date).show_icon(true))
                .changed()
            {
                next_date = Some(date);
            }
            ui.add_space(6.0);
            let next_time = hour_minute(ui, hour, minute);

            if next_date.is_some() || next_time.is_some() {
                let (h, m) = next_time.unwrap_or((hour, minute));
                let date = next_date.unwrap_or(current.date());
                out = Some(format!("{}T{}", date.format(DATE_FORMAT), time_string(h, m)));
            }
        });
    });
    out
}

fn hour_minute(ui: &mut egui::Ui, hour: i32, minute: i32) -> Option<(i32, i32)> {
    let mut h = hour;
    let mut m = minute;
    let mut changed = ui
        .add(
            egui::DragValue::new(&mut h)
                .range(0..=23)
                .speed(0.1)
                .clamp_existing_to_range(true)
                .custom_formatter(|v, _| format_two(v as i32)),
        )
        .changed();
    ui.label(":");
    changed |= ui
        .add(
            egui::DragValue::new(&mut m)
                .range(0..=59)
                .speed(0.1)
                .clamp_existing_to_range(true)
                .custom_formatter(|v, _| format_two(v as i32)),
        )
        .changed();
    changed.then_some((h, m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_value_strings() {
        assert_eq!(
            parse_date("2024-06-15"),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
        assert!(parse_date("15/06/2024").is_none());
        assert_eq!(parse_time("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert!(parse_time("25:00").is_none());

        let dt = parse_datetime("2024-06-15T14:30").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (14, 30));
    }

    #[test]
    fn time_string_clamps_parts() {
        assert_eq!(time_string(7, 3), "07:03");
        assert_eq!(time_string(30, -4), "23:00");
    }
}
