// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod datetime_picker;
pub mod field_renderer;
pub mod form_dialog;
pub mod toggle;

pub use toggle::toggle_switch;
