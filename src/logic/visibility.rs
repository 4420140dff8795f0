// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Visibility resolution for conditional fields.

use crate::models::{FieldDescriptor, Values};

/// Whether `field` participates in rendering and validation for `values`.
pub fn is_visible(field: &FieldDescriptor, values: &Values) -> bool {
    field
        .show_when
        .as_ref()
        .map(|predicate| predicate(values))
        .unwrap_or(true)
}

/// Fields of `fields` that are currently visible, in schema order.
pub fn visible_fields<'a>(
    fields: &'a [FieldDescriptor],
    values: &'a Values,
) -> impl Iterator<Item = &'a FieldDescriptor> + 'a {
    fields.iter().filter(move |f| is_visible(f, values))
}
