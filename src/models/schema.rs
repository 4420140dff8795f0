// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Declarative dialog documents (JSON) turned into `DialogSchema`.
//! Parsing stays pure; behavior hooks that cannot be expressed in JSON are
//! attached by the caller afterwards via [`DialogSchema::field_mut`].

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::dialog::{DialogConfig, DialogSchema};
use super::field::{Constraints, FieldDescriptor, FieldKind, FieldOption};
use super::value::{FieldValue, Values};

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(flatten)]
    config: DialogConfig,
    fields: Vec<FieldRaw>,
}

#[derive(Debug, Deserialize)]
struct FieldRaw {
    name: String,
    #[serde(default)]
    label: Option<String>,
    kind: FieldKind,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    options: Vec<FieldOption>,
    #[serde(default)]
    constraints: Option<ConstraintsRaw>,
    #[serde(default)]
    default_value: Option<FieldValue>,
    #[serde(default)]
    depends_on: Vec<String>,
    #[serde(default)]
    show_when: Option<Condition>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    help_text: Option<String>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    full_width: bool,
    #[serde(default)]
    rows: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct ConstraintsRaw {
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    min_length: Option<usize>,
    #[serde(default)]
    max_length: Option<usize>,
}

/// Visibility conditions expressible in a document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Equals { field: String, value: FieldValue },
    NotEquals { field: String, value: FieldValue },
    OneOf { field: String, values: Vec<FieldValue> },
    Truthy { field: String },
}

impl Condition {
    /// Evaluate against the current value map. Missing fields read as `Empty`.
    pub fn evaluate(&self, values: &Values) -> bool {
        let lookup = |name: &str| values.get(name).cloned().unwrap_or_default();
        match self {
            Self::Equals { field, value } => same_value(&lookup(field.as_str()), value),
            Self::NotEquals { field, value } => !same_value(&lookup(field.as_str()), value),
            Self::OneOf {
                field,
                values: allowed,
            } => {
                let current = lookup(field.as_str());
                allowed.iter().any(|v| same_value(&current, v))
            }
            Self::Truthy { field } => lookup(field.as_str()).is_truthy(),
        }
    }

    fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. }
            | Self::NotEquals { field, .. }
            | Self::OneOf { field, .. }
            | Self::Truthy { field } => field,
        }
    }
}

/// Numbers compare numerically so typed text like `"2"` matches `2`.
fn same_value(current: &FieldValue, expected: &FieldValue) -> bool {
    match (current, expected) {
        (FieldValue::Number(_), _) | (_, FieldValue::Number(_)) => {
            match (current.as_number(), expected.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        _ => current == expected,
    }
}

/// Parse a dialog schema from a JSON document.
///
/// Labels default to the field name. Field names must be unique and
/// `show_when` conditions must reference a field of the same document.
pub fn parse_schema(json: &str) -> Result<DialogSchema> {
    let doc: SchemaDocument =
        serde_json::from_str(json).context("Failed to parse dialog schema JSON")?;

    let mut seen = HashSet::new();
    for raw in &doc.fields {
        if !seen.insert(raw.name.as_str()) {
            bail!("Duplicate field name in schema: {}", raw.name);
        }
    }
    for raw in &doc.fields {
        if raw.kind.uses_options() && raw.options.is_empty() {
            bail!(
                "Field '{}' of kind {} has no options",
                raw.name,
                raw.kind.as_str()
            );
        }
        if let Some(cond) = &raw.show_when
            && !seen.contains(cond.field())
        {
            bail!(
                "Field '{}' is shown depending on unknown field '{}'",
                raw.name,
                cond.field()
            );
        }
    }

    let fields = doc
        .fields
        .into_iter()
        .map(into_descriptor)
        .collect::<Result<Vec<_>>>()?;

    Ok(DialogSchema::new(doc.config, fields))
}

/// Read and parse a schema document from disk.
pub fn load_schema_file(path: &Path) -> Result<DialogSchema> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    parse_schema(&content).with_context(|| format!("Invalid schema in {}", path.display()))
}

fn into_descriptor(raw: FieldRaw) -> Result<FieldDescriptor> {
    let label = raw
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| raw.name.clone());

    let mut field = FieldDescriptor::new(raw.name, label, raw.kind);
    field.required = raw.required;
    field.options = raw.options;
    field.default_value = raw.default_value;
    field.depends_on = raw.depends_on;
    field.placeholder = raw.placeholder.filter(|p| !p.trim().is_empty());
    field.help_text = raw.help_text.filter(|h| !h.trim().is_empty());
    field.disabled = raw.disabled;
    field.full_width = raw.full_width;
    field.rows = raw.rows;

    if let Some(c) = raw.constraints {
        let mut constraints = Constraints::default()
            .with_range(c.min, c.max)
            .with_length(c.min_length, c.max_length);
        if let Some(pattern) = c.pattern.as_deref() {
            constraints = constraints
                .with_pattern(pattern)
                .with_context(|| format!("Field '{}'", field.name))?;
        }
        field.constraints = Some(constraints);
    }

    if let Some(cond) = raw.show_when {
        field = field.show_when(move |values| cond.evaluate(values));
    }

    Ok(field)
}
