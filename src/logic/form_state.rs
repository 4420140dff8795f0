// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Owned form state (values, errors, touched flags) and its transitions.
//!
//! Transitions take the state by value and return the next state so they can
//! be exercised without any UI. Every map is keyed by schema field names only.

use std::collections::{BTreeMap, BTreeSet};

use super::validation::{FormValidation, validate_field, validate_form};
use super::visibility::is_visible;
use crate::models::{FieldDescriptor, FieldValue, Values};

/// Values, validation errors and touched flags of one open dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    values: Values,
    errors: BTreeMap<String, String>,
    touched: BTreeSet<String>,
}

impl FormState {
    /// Seed values for every field: initial value, else default, else zero value.
    pub fn initialize(fields: &[FieldDescriptor], initial_values: &Values) -> Self {
        let values = fields
            .iter()
            .map(|f| {
                let value = initial_values
                    .get(&f.name)
                    .cloned()
                    .unwrap_or_else(|| f.seed_value());
                (f.name.clone(), value)
            })
            .collect();

        Self {
            values,
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
        }
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Error to display for `name`: only once the field has been touched.
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.error(name)
        } else {
            None
        }
    }

    /// Values of the fields visible for the current values, in a fresh map.
    pub fn visible_values(&self, fields: &[FieldDescriptor]) -> Values {
        fields
            .iter()
            .filter(|f| is_visible(f, &self.values))
            .filter_map(|f| {
                self.values
                    .get(&f.name)
                    .map(|v| (f.name.clone(), v.clone()))
            })
            .collect()
    }

    /// Write a new value, run the field's change hook, and refresh errors.
    ///
    /// The field's error is recomputed only when it is already touched and
    /// `validate_on_change` is set; otherwise validation waits for blur or
    /// submit. Errors of fields hidden by the new values are dropped.
    pub fn apply_change(
        mut self,
        fields: &[FieldDescriptor],
        name: &str,
        value: FieldValue,
        validate_on_change: bool,
    ) -> Self {
        let Some(field) = fields.iter().find(|f| f.name == name) else {
            tracing::debug!(field = name, "ignoring change for unknown field");
            return self;
        };

        self.values.insert(field.name.clone(), value.clone());
        if let Some(hook) = &field.on_change {
            hook(&value, &mut self.values);
            self.values.retain(|k, _| fields.iter().any(|f| &f.name == k));
            for f in fields {
                if !self.values.contains_key(&f.name) {
                    self.values.insert(f.name.clone(), f.seed_value());
                }
            }
        }

        if validate_on_change && self.is_touched(name) {
            self.refresh_error(field);
        }

        self.drop_hidden_errors(fields);
        self
    }

    /// Mark the field touched and validate it.
    pub fn apply_blur(mut self, fields: &[FieldDescriptor], name: &str) -> Self {
        let Some(field) = fields.iter().find(|f| f.name == name) else {
            tracing::debug!(field = name, "ignoring blur for unknown field");
            return self;
        };

        self.touched.insert(field.name.clone());
        if is_visible(field, &self.values) {
            self.refresh_error(field);
        } else {
            self.errors.remove(&field.name);
        }
        self
    }

    /// Touch every schema field and validate the visible ones.
    ///
    /// Hidden fields are touched as well so that revealing one later shows
    /// its error immediately; they never contribute errors.
    pub fn apply_submit_attempt(mut self, fields: &[FieldDescriptor]) -> (Self, FormValidation) {
        self.touched = fields.iter().map(|f| f.name.clone()).collect();
        let validation = validate_form(fields, &self.values);
        self.errors = validation.errors.clone();
        (self, validation)
    }

    fn refresh_error(&mut self, field: &FieldDescriptor) {
        let value = self.values.get(&field.name).cloned().unwrap_or_default();
        match validate_field(field, &value) {
            Some(err) => {
                self.errors.insert(field.name.clone(), err);
            }
            None => {
                self.errors.remove(&field.name);
            }
        }
    }

    fn drop_hidden_errors(&mut self, fields: &[FieldDescriptor]) {
        for f in fields {
            if !is_visible(f, &self.values) {
                self.errors.remove(&f.name);
            }
        }
    }
}
