// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Dialog schemas owned by the dashboard screens.

use anyhow::{Context, Result};

use crate::logic::store::Collection;
use crate::models::schema::parse_schema;
use crate::models::{
    Constraints, DialogConfig, DialogSchema, FieldDescriptor, FieldKind, FieldOption, FieldValue,
    Values,
};

const ESCALATION_SCHEMA: &str = include_str!("../assets/forms/escalation.json");

const MAX_AGENT_SKILLS: usize = 3;

/// Schema of the dialog editing records of `collection`.
pub fn schema_for(collection: Collection, editing: bool) -> Result<DialogSchema> {
    match collection {
        Collection::Users => Ok(user_form(editing)),
        Collection::Escalations => escalation_form(editing),
    }
}

/// Directory entry for agents, supervisors and admins.
pub fn user_form(editing: bool) -> DialogSchema {
    let config = if editing {
        DialogConfig::titled("Edit user")
            .subtitle("Update directory details")
            .save_button_text("Save changes")
    } else {
        DialogConfig::titled("New user").subtitle("Add a member to the call-center directory")
    };

    let is_agent =
        |v: &Values| v.get("role").and_then(FieldValue::as_str) == Some("agent");

    let fields = vec![
        FieldDescriptor::new("full_name", "Full name", FieldKind::Text)
            .required()
            .constraints(Constraints::default().with_length(Some(2), Some(80)))
            .on_change(|value, values| {
                let username = username_from(&value.to_string());
                values.insert("username".into(), FieldValue::Text(username));
            }),
        FieldDescriptor::new("username", "Username", FieldKind::Text)
            .disabled()
            .depends_on(["full_name"])
            .help_text("Derived from the full name"),
        FieldDescriptor::new("email", "Email", FieldKind::Email)
            .required()
            .placeholder("name@example.com"),
        FieldDescriptor::new("phone", "Phone", FieldKind::Tel).placeholder("+1 (555) 123-4567"),
        FieldDescriptor::new("role", "Role", FieldKind::Select)
            .required()
            .default_value("agent")
            .options(vec![
                FieldOption::new("agent", "Agent"),
                FieldOption::new("supervisor", "Supervisor"),
                FieldOption::new("admin", "Admin"),
                FieldOption::new("facility_admin", "Facility admin"),
            ]),
        FieldDescriptor::new("extension", "Extension", FieldKind::Number)
            .required()
            .depends_on(["role"])
            .show_when(is_agent)
            .constraints(Constraints::default().with_range(Some(1000.0), Some(9999.0))),
        FieldDescriptor::new("skills", "Skills", FieldKind::Multiselect)
            .depends_on(["role"])
            .show_when(is_agent)
            .full_width()
            .options(vec![
                FieldOption::new("billing", "Billing"),
                FieldOption::new("technical", "Technical support"),
                FieldOption::new("sales", "Sales"),
                FieldOption::new("spanish", "Spanish"),
                FieldOption::new("french", "French").disabled(),
            ])
            .constraints(Constraints::default().with_custom(|value| {
                let count = value.as_list().map(<[String]>::len).unwrap_or(0);
                (count > MAX_AGENT_SKILLS)
                    .then(|| format!("Pick at most {MAX_AGENT_SKILLS} skills"))
            })),
        FieldDescriptor::new("country", "Country", FieldKind::Select)
            .required()
            .options(vec![
                FieldOption::new("US", "United States"),
                FieldOption::new("UG", "Uganda"),
                FieldOption::new("GB", "United Kingdom"),
                FieldOption::new("IN", "India"),
            ])
            .on_change(|value, values| {
                if value.as_str() != Some("US") {
                    values.insert("state".into(), FieldValue::Text(String::new()));
                }
            }),
        FieldDescriptor::new("state", "State", FieldKind::Select)
            .required()
            .depends_on(["country"])
            .show_when(|v| v.get("country").and_then(FieldValue::as_str) == Some("US"))
            .options(vec![
                FieldOption::new("CA", "California"),
                FieldOption::new("NY", "New York"),
                FieldOption::new("TX", "Texas"),
                FieldOption::new("WA", "Washington"),
            ]),
        FieldDescriptor::new("crm_profile", "CRM profile", FieldKind::Url)
            .placeholder("https://crm.example.com/users/42"),
        FieldDescriptor::new("pin", "Voicemail PIN", FieldKind::Password)
            .constraints(Constraints::default().with_length(Some(4), Some(6)).with_custom(
                |value| {
                    value
                        .as_str()
                        .filter(|pin| !pin.chars().all(|c| c.is_ascii_digit()))
                        .map(|_| "Voicemail PIN must contain digits only".to_string())
                },
            )),
        FieldDescriptor::new("start_date", "Start date", FieldKind::Date),
        FieldDescriptor::new("shift_start", "Shift starts", FieldKind::Time)
            .default_value("09:00"),
        FieldDescriptor::new("available_from", "Available from", FieldKind::Datetime),
        FieldDescriptor::new("active", "Active", FieldKind::Switch).default_value(true),
        FieldDescriptor::new("notes", "Notes", FieldKind::Textarea)
            .full_width()
            .rows(3)
            .constraints(Constraints::default().with_length(None, Some(300))),
    ];

    DialogSchema::new(config, fields)
}

/// Supervisor escalation form, loaded from its JSON document.
pub fn escalation_form(editing: bool) -> Result<DialogSchema> {
    let mut schema =
        parse_schema(ESCALATION_SCHEMA).context("Built-in escalation schema is invalid")?;

    if editing {
        schema.config.title = "Edit escalation".to_string();
        schema.config.save_button_text = "Save changes".to_string();
    }

    if let Some(reasons) = schema.field_mut("reasons") {
        let constraints = reasons.constraints.take().unwrap_or_default();
        reasons.constraints = Some(constraints.with_custom(|value| {
            let picked = value.as_list().unwrap_or_default();
            (picked.iter().any(|r| r == "abuse") && picked.len() > 1)
                .then(|| "Abusive caller escalations must not list other reasons".to_string())
        }));
    }

    Ok(schema)
}

/// `"Dana  O'Neil"` → `"dana.oneil"`.
fn username_from(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::form_state::FormState;
    use crate::logic::validation::validate_form;

    #[test]
    fn username_is_derived_from_name() {
        assert_eq!(username_from("Dana  O'Neil"), "dana.oneil");
        assert_eq!(username_from("  "), "");
    }

    #[test]
    fn user_form_covers_every_kind() {
        let schema = user_form(false);
        let mut kinds: Vec<_> = schema.fields.iter().map(|f| f.kind.as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        // radio and checkbox come from the escalation document.
        assert_eq!(kinds.len(), 13);
        assert_eq!(schema.config.title, "New user");
    }

    #[test]
    fn user_form_autofills_username_and_resets_state() {
        let schema = user_form(false);
        let mut initial = Values::new();
        initial.insert("country".into(), FieldValue::text("US"));
        initial.insert("state".into(), FieldValue::text("TX"));

        let state = FormState::initialize(&schema.fields, &initial)
            .apply_change(&schema.fields, "full_name", FieldValue::text("Ada Lovelace"), false)
            .apply_change(&schema.fields, "country", FieldValue::text("UG"), false);

        assert_eq!(state.value("username"), Some(&FieldValue::text("ada.lovelace")));
        assert_eq!(state.value("state"), Some(&FieldValue::text("")));
    }

    #[test]
    fn agent_only_fields_follow_role() {
        let schema = user_form(false);
        let mut values = FormState::initialize(&schema.fields, &Values::new())
            .values()
            .clone();
        values.insert("full_name".into(), FieldValue::text("Ada Lovelace"));
        values.insert("email".into(), FieldValue::text("ada@example.com"));
        values.insert("country".into(), FieldValue::text("GB"));

        let as_agent = validate_form(&schema.fields, &values);
        assert_eq!(as_agent.error("extension"), Some("Extension is required"));

        values.insert("role".into(), FieldValue::text("admin"));
        assert!(validate_form(&schema.fields, &values).is_valid());
    }

    #[test]
    fn escalation_form_loads_with_custom_rule() {
        let schema = escalation_form(false).unwrap();
        assert_eq!(schema.config.save_button_text, "Escalate");
        assert!(schema.config.validate_on_change);

        let reasons = schema.field("reasons").unwrap();
        let custom = reasons.constraints.as_ref().unwrap().custom.as_ref().unwrap();
        assert!(custom(&FieldValue::list(["abuse", "billing"])).is_some());
        assert!(custom(&FieldValue::list(["abuse"])).is_none());
    }

    #[test]
    fn escalation_follow_up_fields_are_conditional() {
        let schema = escalation_form(true).unwrap();
        assert_eq!(schema.config.title, "Edit escalation");

        let mut values = FormState::initialize(&schema.fields, &Values::new())
            .values()
            .clone();
        values.insert("call_id".into(), FieldValue::text("CL-000123"));
        values.insert("reasons".into(), FieldValue::list(["billing"]));
        values.insert(
            "summary".into(),
            FieldValue::text("Customer disputes the March invoice."),
        );
        assert!(validate_form(&schema.fields, &values).is_valid());

        values.insert("follow_up".into(), FieldValue::Bool(true));
        let result = validate_form(&schema.fields, &values);
        assert_eq!(result.error("follow_up_date"), Some("Follow-up date is required"));
    }
}
