// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Switch control for boolean `switch` fields.

use eframe::egui;

/// Draw a pill switch followed by an on/off caption.
///
/// Returns the switch response; `changed()` is set when it flipped.
pub fn toggle_switch(ui: &mut egui::Ui, on: &mut bool) -> egui::Response {
    let height = ui.spacing().interact_size.y.max(18.0);
    let size = egui::vec2(height * 1.9, height);
    let (rect, mut response) = ui.allocate_exact_size(size, egui::Sense::click());
    if response.clicked() {
        *on = !*on;
        response.mark_changed();
    }

    if ui.is_rect_visible(rect) {
        let t = ui.ctx().animate_bool_responsive(response.id, *on);
        let visuals = ui.style().interact_selectable(&response, *on);
        let radius = 0.5 * rect.height();
        ui.painter()
            .rect_filled(rect.expand(visuals.expansion), radius, visuals.bg_fill);

        let knob_x = egui::lerp((rect.left() + radius)..=(rect.right() - radius), t);
        ui.painter().circle(
            egui::pos2(knob_x, rect.center().y),
            0.75 * radius,
            visuals.fg_stroke.color,
            visuals.fg_stroke,
        );
    }

    ui.label(
        egui::RichText::new(if *on { "On" } else { "Off" })
            .small()
            .color(egui::Color32::from_gray(120)),
    );

    response
}
