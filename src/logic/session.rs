// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! One open dialog: schema, form state, and the validate-then-save pipeline.
//!
//! A session exists only while its dialog is open. Closing the dialog drops
//! the session, so nothing from an earlier edit can leak into the next open.

use std::sync::Arc;

use super::form_state::FormState;
use super::validation::FormValidation;
use crate::models::{DialogSchema, FieldDescriptor, FieldValue, Values};

/// What a submit request turned into.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// A save is already in flight.
    Ignored,
    /// Validation failed; errors are now visible.
    Rejected(FormValidation),
    /// Validation passed; the caller must run the save with these values.
    Dispatched(Values),
}

/// How an in-flight save ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitResolution {
    /// The dialog should close.
    Saved,
    /// The dialog stays open with its input intact.
    Failed,
    /// No save was in flight.
    Unexpected,
}

/// State of one open dialog.
#[derive(Clone, Debug)]
pub struct DialogSession {
    schema: Arc<DialogSchema>,
    state: FormState,
    is_submitting: bool,
    submit_error: Option<String>,
}

impl DialogSession {
    /// Open a fresh session seeded from `initial_values` and field defaults.
    pub fn open(schema: Arc<DialogSchema>, initial_values: &Values) -> Self {
        let state = FormState::initialize(&schema.fields, initial_values);
        tracing::info!(
            dialog = %schema.config.title,
            fields = schema.fields.len(),
            "dialog opened"
        );
        Self {
            schema,
            state,
            is_submitting: false,
            submit_error: None,
        }
    }

    pub fn schema(&self) -> &DialogSchema {
        &self.schema
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.schema.fields
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Last save failure, shown as a banner until dismissed or resubmitted.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Whether cancel/close controls may act.
    pub fn can_close(&self) -> bool {
        !self.is_submitting
    }

    pub fn change(&mut self, name: &str, value: FieldValue) {
        if self.is_submitting {
            tracing::debug!(field = name, "change ignored while submitting");
            return;
        }
        tracing::trace!(field = name, "field changed");
        let validate_on_change = self.schema.config.validate_on_change;
        let state = std::mem::take(&mut self.state);
        self.state = state.apply_change(&self.schema.fields, name, value, validate_on_change);
    }

    pub fn blur(&mut self, name: &str) {
        if self.is_submitting {
            return;
        }
        let state = std::mem::take(&mut self.state);
        self.state = state.apply_blur(&self.schema.fields, name);
    }

    pub fn dismiss_submit_error(&mut self) {
        self.submit_error = None;
    }

    /// Touch everything, validate, and hand back the values to save when clean.
    ///
    /// The dispatched map holds only the fields visible at submission.
    pub fn begin_submit(&mut self) -> SubmitOutcome {
        if self.is_submitting {
            tracing::debug!("submit ignored, save already in flight");
            return SubmitOutcome::Ignored;
        }

        let state = std::mem::take(&mut self.state);
        let (state, validation) = state.apply_submit_attempt(&self.schema.fields);
        self.state = state;

        if !validation.is_valid() {
            tracing::debug!(errors = validation.errors.len(), "submit blocked by validation");
            return SubmitOutcome::Rejected(validation);
        }

        self.is_submitting = true;
        self.submit_error = None;
        SubmitOutcome::Dispatched(self.state.visible_values(&self.schema.fields))
    }

    /// Apply the result of the external save.
    pub fn complete_submit(&mut self, result: Result<(), String>) -> SubmitResolution {
        if !self.is_submitting {
            tracing::warn!("save completion received with no save in flight");
            return SubmitResolution::Unexpected;
        }
        self.is_submitting = false;

        match result {
            Ok(()) => {
                tracing::info!(dialog = %self.schema.config.title, "dialog saved");
                SubmitResolution::Saved
            }
            Err(err) => {
                tracing::warn!(dialog = %self.schema.config.title, error = %err, "save failed");
                self.submit_error = Some(err);
                SubmitResolution::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DialogConfig, FieldKind};

    fn schema() -> Arc<DialogSchema> {
        Arc::new(DialogSchema::new(
            DialogConfig::titled("New agent"),
            vec![
                FieldDescriptor::new("email", "Email", FieldKind::Email).required(),
                FieldDescriptor::new("country", "Country", FieldKind::Select),
                FieldDescriptor::new("state", "State", FieldKind::Text)
                    .required()
                    .show_when(|v| v.get("country").and_then(FieldValue::as_str) == Some("US")),
            ],
        ))
    }

    #[test]
    fn invalid_form_never_dispatches() {
        let mut session = DialogSession::open(schema(), &Values::new());

        match session.begin_submit() {
            SubmitOutcome::Rejected(validation) => {
                assert_eq!(validation.error("email"), Some("Email is required"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(!session.is_submitting());
        assert_eq!(session.state().visible_error("email"), Some("Email is required"));
    }

    #[test]
    fn valid_form_dispatches_visible_values_once() {
        let mut session = DialogSession::open(schema(), &Values::new());
        session.change("email", FieldValue::text("agent@example.com"));
        session.change("country", FieldValue::text("UG"));

        let values = match session.begin_submit() {
            SubmitOutcome::Dispatched(values) => values,
            other => panic!("expected dispatch, got {other:?}"),
        };
        assert_eq!(values.get("email"), Some(&FieldValue::text("agent@example.com")));
        assert!(!values.contains_key("state"));
        assert!(session.is_submitting());
        assert!(!session.can_close());

        assert_eq!(session.begin_submit(), SubmitOutcome::Ignored);
    }

    #[test]
    fn edits_are_frozen_while_submitting() {
        let mut session = DialogSession::open(schema(), &Values::new());
        session.change("email", FieldValue::text("agent@example.com"));
        let _ = session.begin_submit();

        session.change("email", FieldValue::text("other@example.com"));
        assert_eq!(
            session.state().value("email"),
            Some(&FieldValue::text("agent@example.com"))
        );
    }

    #[test]
    fn failed_save_keeps_input_and_reports() {
        let mut session = DialogSession::open(schema(), &Values::new());
        session.change("email", FieldValue::text("agent@example.com"));
        let _ = session.begin_submit();
        let before = session.state().values().clone();

        let resolution = session.complete_submit(Err("Email already registered".into()));

        assert_eq!(resolution, SubmitResolution::Failed);
        assert!(!session.is_submitting());
        assert!(session.can_close());
        assert_eq!(session.state().values(), &before);
        assert_eq!(session.submit_error(), Some("Email already registered"));

        // Resubmitting clears the banner.
        assert!(matches!(session.begin_submit(), SubmitOutcome::Dispatched(_)));
        assert_eq!(session.submit_error(), None);
    }

    #[test]
    fn successful_save_resolves_saved() {
        let mut session = DialogSession::open(schema(), &Values::new());
        session.change("email", FieldValue::text("agent@example.com"));
        let _ = session.begin_submit();
        assert_eq!(session.complete_submit(Ok(())), SubmitResolution::Saved);
    }

    #[test]
    fn stray_completion_is_flagged() {
        let mut session = DialogSession::open(schema(), &Values::new());
        assert_eq!(
            session.complete_submit(Ok(())),
            SubmitResolution::Unexpected
        );
    }
}
