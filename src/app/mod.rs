// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring egui/eframe to launch the desk UI.

use std::sync::Arc;

use anyhow::Result;
use eframe::egui;
use egui_phosphor::Variant;

use crate::logic::store::{Collection, MemoryStore, RecordStore};
use crate::models::{FieldValue, Values};
use crate::ui::DeskApp;

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run() -> eframe::Result<()> {
    let store = MemoryStore::new();
    if let Err(err) = seed_demo_records(&store) {
        tracing::warn!(error = %format!("{err:#}"), "could not seed demo records");
    }
    let store: Arc<dyn RecordStore> = Arc::new(store);

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 500.0]),
        ..Default::default()
    };

    tracing::info!("starting call-center desk");
    eframe::run_native(
        "Call-center desk",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(DeskApp::new(store)))
        }),
    )
}

/// Fill the in-memory store with a few records so the views are not empty.
pub fn seed_demo_records(store: &dyn RecordStore) -> Result<()> {
    let users: [&[(&str, FieldValue)]; 2] = [
        &[
            ("full_name", FieldValue::text("Grace Hopper")),
            ("username", FieldValue::text("grace.hopper")),
            ("email", FieldValue::text("grace@example.com")),
            ("role", FieldValue::text("supervisor")),
            ("country", FieldValue::text("US")),
            ("state", FieldValue::text("NY")),
            ("active", FieldValue::Bool(true)),
        ],
        &[
            ("full_name", FieldValue::text("Okello James")),
            ("username", FieldValue::text("okello.james")),
            ("email", FieldValue::text("okello@example.com")),
            ("role", FieldValue::text("agent")),
            ("extension", FieldValue::text("4102")),
            ("skills", FieldValue::list(["billing", "technical"])),
            ("country", FieldValue::text("UG")),
            ("active", FieldValue::Bool(true)),
        ],
    ];
    for user in users {
        store.save(Collection::Users, None, &to_values(user))?;
    }

    store.save(
        Collection::Escalations,
        None,
        &to_values(&[
            ("call_id", FieldValue::text("CL-004211")),
            ("priority", FieldValue::text("high")),
            ("reasons", FieldValue::list(["billing"])),
            ("follow_up", FieldValue::Bool(false)),
            (
                "summary",
                FieldValue::text("Caller charged twice for the March plan."),
            ),
        ]),
    )?;
    Ok(())
}

fn to_values(pairs: &[(&str, FieldValue)]) -> Values {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms;
    use crate::logic::validation::validate_form;

    #[test]
    fn seeded_records_pass_their_forms() {
        let store = MemoryStore::new();
        seed_demo_records(&store).unwrap();

        let users = store.list(Collection::Users).unwrap();
        assert_eq!(users.len(), 2);
        let user_form = forms::user_form(true);
        for user in &users {
            let state =
                crate::logic::form_state::FormState::initialize(&user_form.fields, &user.values);
            let result = validate_form(&user_form.fields, state.values());
            assert!(result.is_valid(), "{:?}", result.errors);
        }

        let escalation_form = forms::escalation_form(true).unwrap();
        for esc in store.list(Collection::Escalations).unwrap() {
            let state =
                crate::logic::form_state::FormState::initialize(&escalation_form.fields, &esc.values);
            assert!(validate_form(&escalation_form.fields, state.values()).is_valid());
        }
    }
}
