// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Call-center desk: records views plus a declarative slide-in form dialog
//! engine (typed field schemas, validation, conditional visibility, and a
//! validate-then-save pipeline).

pub mod app;
pub mod forms;
pub mod logic;
pub mod models;
pub mod mvu;
pub mod ui;
