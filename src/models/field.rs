// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field descriptors: the schema entries a screen hands to the form dialog.
//! Descriptors are immutable once built; behavior hooks are shared closures.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::value::{FieldValue, Values};

/// Pure predicate deciding whether a field is active for the current values.
pub type ShowWhen = Arc<dyn Fn(&Values) -> bool + Send + Sync>;
/// Caller-supplied validator; returns the message to show verbatim.
pub type CustomValidator = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;
/// Side hook run after a value changes, allowed to derive other fields.
pub type OnChange = Arc<dyn Fn(&FieldValue, &mut Values) + Send + Sync>;

/// Control kinds a descriptor can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Number,
    Tel,
    Url,
    Textarea,
    Select,
    Multiselect,
    Checkbox,
    Radio,
    Switch,
    Date,
    Time,
    Datetime,
}

impl FieldKind {
    /// String form used in schema documents and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Switch => "switch",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
        }
    }

    /// Value a field starts with when neither initial nor default value is given.
    pub fn zero_value(&self) -> FieldValue {
        match self {
            Self::Multiselect => FieldValue::List(Vec::new()),
            Self::Checkbox | Self::Switch => FieldValue::Bool(false),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// Whether the kind picks from `options`.
    pub fn uses_options(&self) -> bool {
        matches!(self, Self::Select | Self::Multiselect | Self::Radio)
    }
}

/// One selectable entry of a select, multiselect or radio field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Optional validation bundle attached to a descriptor.
#[derive(Clone, Default)]
pub struct Constraints {
    pub pattern: Option<Regex>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub custom: Option<CustomValidator>,
}

impl Constraints {
    /// Compile `pattern` and attach it.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).with_context(|| format!("Invalid pattern `{pattern}`"))?;
        self.pattern = Some(re);
        Ok(self)
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_length(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    pub fn with_custom(
        mut self,
        custom: impl Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.custom = Some(Arc::new(custom));
        self
    }
}

impl fmt::Debug for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraints")
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("min", &self.min)
            .field("max", &self.max)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

/// Schema entry describing one form input.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<FieldOption>,
    pub constraints: Option<Constraints>,
    pub default_value: Option<FieldValue>,
    /// Informational only; visibility is decided by `show_when`.
    pub depends_on: Vec<String>,
    pub show_when: Option<ShowWhen>,
    pub on_change: Option<OnChange>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub disabled: bool,
    /// Span every grid column instead of one cell.
    pub full_width: bool,
    /// Visible rows for textareas.
    pub rows: Option<usize>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
            constraints: None,
            default_value: None,
            depends_on: Vec::new(),
            show_when: None,
            on_change: None,
            placeholder: None,
            help_text: None,
            disabled: false,
            full_width: false,
            rows: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn show_when(mut self, predicate: impl Fn(&Values) -> bool + Send + Sync + 'static) -> Self {
        self.show_when = Some(Arc::new(predicate));
        self
    }

    pub fn on_change(
        mut self,
        hook: impl Fn(&FieldValue, &mut Values) + Send + Sync + 'static,
    ) -> Self {
        self.on_change = Some(Arc::new(hook));
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn full_width(mut self) -> Self {
        self.full_width = true;
        self
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Seed value when the caller supplied no initial value.
    pub fn seed_value(&self) -> FieldValue {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.kind.zero_value())
    }

    /// Label of the option whose value matches, if any.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("options", &self.options)
            .field("constraints", &self.constraints)
            .field("default_value", &self.default_value)
            .field("depends_on", &self.depends_on)
            .field("show_when", &self.show_when.is_some())
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_follow_kind() {
        assert_eq!(
            FieldKind::Multiselect.zero_value(),
            FieldValue::List(Vec::new())
        );
        assert_eq!(FieldKind::Checkbox.zero_value(), FieldValue::Bool(false));
        assert_eq!(FieldKind::Switch.zero_value(), FieldValue::Bool(false));
        assert_eq!(FieldKind::Number.zero_value(), FieldValue::text(""));
        assert_eq!(FieldKind::Date.zero_value(), FieldValue::text(""));
    }

    #[test]
    fn seed_prefers_default_value() {
        let field = FieldDescriptor::new("tier", "Tier", FieldKind::Select).default_value("gold");
        assert_eq!(field.seed_value(), FieldValue::text("gold"));

        let bare = FieldDescriptor::new("tier", "Tier", FieldKind::Select);
        assert_eq!(bare.seed_value(), FieldValue::text(""));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = Constraints::default().with_pattern("(unclosed").unwrap_err();
        assert!(err.to_string().contains("Invalid pattern"));
    }

    #[test]
    fn kind_tokens_match_serde_names() {
        for kind in [FieldKind::Multiselect, FieldKind::Datetime, FieldKind::Tel] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
