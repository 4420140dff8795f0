// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: field descriptors, values, and dialog schemas shared between logic and UI.

pub mod dialog;
pub mod field;
pub mod schema;
pub mod value;

pub use dialog::{DialogConfig, DialogSchema};
pub use field::{Constraints, FieldDescriptor, FieldKind, FieldOption};
pub use value::{FieldValue, Values};
