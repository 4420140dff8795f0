// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Form engine logic: validation, visibility, form state, dialog sessions,
//! and the record store seam used by the save pipeline.

pub mod form_state;
pub mod session;
pub mod store;
pub mod validation;
pub mod visibility;
