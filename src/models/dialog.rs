// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Dialog-level configuration and the schema bundle a screen opens.

use serde::Deserialize;

use super::field::FieldDescriptor;

fn default_save_text() -> String {
    "Save".to_string()
}

fn default_cancel_text() -> String {
    "Cancel".to_string()
}

fn default_grid_columns() -> usize {
    2
}

fn default_width() -> f32 {
    480.0
}

/// Display configuration of a slide-in dialog.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DialogConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default = "default_save_text")]
    pub save_button_text: String,
    #[serde(default = "default_cancel_text")]
    pub cancel_button_text: String,
    /// Layout hint: number of grid columns for regular fields.
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
    /// Externally driven disable-all flag, independent of submission.
    #[serde(default)]
    pub loading: bool,
    /// Re-validate already touched fields on every change.
    #[serde(default)]
    pub validate_on_change: bool,
    /// Panel width in points.
    #[serde(default = "default_width")]
    pub width: f32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: None,
            save_button_text: default_save_text(),
            cancel_button_text: default_cancel_text(),
            grid_columns: default_grid_columns(),
            loading: false,
            validate_on_change: false,
            width: default_width(),
        }
    }
}

impl DialogConfig {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn save_button_text(mut self, text: impl Into<String>) -> Self {
        self.save_button_text = text.into();
        self
    }

    pub fn grid_columns(mut self, columns: usize) -> Self {
        self.grid_columns = columns;
        self
    }

    pub fn validate_on_change(mut self, enabled: bool) -> Self {
        self.validate_on_change = enabled;
        self
    }
}

/// Ordered field descriptors plus display configuration.
#[derive(Clone, Debug, Default)]
pub struct DialogSchema {
    pub config: DialogConfig,
    pub fields: Vec<FieldDescriptor>,
}

impl DialogSchema {
    pub fn new(config: DialogConfig, fields: Vec<FieldDescriptor>) -> Self {
        Self { config, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Mutable access used by callers to attach hooks after loading a document.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldDescriptor> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}
