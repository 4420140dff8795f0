// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field and form validation. Everything here is pure: descriptors and values
//! in, user-facing messages out.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::visibility::is_visible;
use crate::models::{FieldDescriptor, FieldKind, FieldValue, Values};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

// Optional `+`, up to three country digits, an optional parenthesized area
// code, then digit groups separated by space, dot or dash.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?\d{0,3}[\s.-]?(?:\(\d{1,4}\)[\s.-]?)?\d(?:[\d\s.-]*\d)?$")
        .expect("static regex")
});

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// Result of validating every visible field of a form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub errors: BTreeMap<String, String>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }
}

/// Validate a single value against its descriptor.
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. required/empty (empty values skip everything else),
/// 2. kind checks: email, URL, phone, numeric parse,
/// 3. constraints: pattern, `min` then `max` (number fields),
///    `min_length` then `max_length` (text values), custom validator.
///
/// # Examples
///
/// ```
/// use ccdesk::logic::validation::validate_field;
/// use ccdesk::models::{FieldDescriptor, FieldKind, FieldValue};
///
/// let email = FieldDescriptor::new("email", "Email", FieldKind::Email).required();
/// assert_eq!(validate_field(&email, &FieldValue::text("")).as_deref(), Some("Email is required"));
/// assert_eq!(validate_field(&email, &FieldValue::text("a@b.com")), None);
/// ```
pub fn validate_field(field: &FieldDescriptor, value: &FieldValue) -> Option<String> {
    if value.is_empty() {
        return field
            .required
            .then(|| format!("{} is required", field.label));
    }

    if let Some(err) = kind_error(field, value) {
        return Some(err);
    }

    let constraints = field.constraints.as_ref()?;

    if let Some(pattern) = &constraints.pattern
        && !pattern.is_match(&value.to_string())
    {
        return Some(format!("{} format is invalid", field.label));
    }

    if field.kind == FieldKind::Number
        && let Some(n) = value.as_number()
    {
        if let Some(min) = constraints.min
            && n < min
        {
            return Some(format!("{} must be at least {}", field.label, min));
        }
        if let Some(max) = constraints.max
            && n > max
        {
            return Some(format!("{} must be at most {}", field.label, max));
        }
    }

    if let Some(text) = value.as_str() {
        let len = text.chars().count();
        if let Some(min_length) = constraints.min_length
            && len < min_length
        {
            return Some(format!(
                "{} must be at least {} characters",
                field.label, min_length
            ));
        }
        if let Some(max_length) = constraints.max_length
            && len > max_length
        {
            return Some(format!(
                "{} must be at most {} characters",
                field.label, max_length
            ));
        }
    }

    constraints.custom.as_ref().and_then(|custom| custom(value))
}

fn kind_error(field: &FieldDescriptor, value: &FieldValue) -> Option<String> {
    // Raw text: surrounding whitespace is part of the stored value.
    let text = value.to_string();
    match field.kind {
        FieldKind::Email if !EMAIL_RE.is_match(&text) => Some("Invalid email address".into()),
        FieldKind::Url if Url::parse(&text).is_err() => Some("Invalid URL".into()),
        FieldKind::Tel if !is_phone_number(&text) => Some("Invalid phone number".into()),
        FieldKind::Number if value.as_number().is_none() => {
            Some(format!("{} must be a valid number", field.label))
        }
        _ => None,
    }
}

fn is_phone_number(text: &str) -> bool {
    let digits = text.chars().filter(char::is_ascii_digit).count();
    PHONE_RE.is_match(text) && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// Validate every visible field in schema order.
///
/// Hidden fields never appear in the result, whatever their value.
pub fn validate_form(fields: &[FieldDescriptor], values: &Values) -> FormValidation {
    let errors = fields
        .iter()
        .filter(|f| is_visible(f, values))
        .filter_map(|f| {
            let value = values.get(&f.name).cloned().unwrap_or_default();
            validate_field(f, &value).map(|err| (f.name.clone(), err))
        })
        .collect();
    FormValidation { errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Constraints;

    fn check(field: &FieldDescriptor, value: impl Into<FieldValue>) -> Option<String> {
        validate_field(field, &value.into())
    }

    #[test]
    fn required_rejects_every_empty_shape() {
        for kind in [FieldKind::Text, FieldKind::Multiselect, FieldKind::Select] {
            let field = FieldDescriptor::new("f", "Queue", kind).required();
            for empty in [
                FieldValue::text(""),
                FieldValue::Empty,
                FieldValue::List(Vec::new()),
            ] {
                assert_eq!(
                    validate_field(&field, &empty).as_deref(),
                    Some("Queue is required")
                );
            }
        }
    }

    #[test]
    fn optional_empty_skips_all_checks() {
        let field = FieldDescriptor::new("site", "Site", FieldKind::Url).constraints(
            Constraints::default()
                .with_length(Some(5), None)
                .with_custom(|_| Some("never".into())),
        );
        assert_eq!(check(&field, ""), None);
        assert_eq!(validate_field(&field, &FieldValue::Empty), None);
    }

    #[test]
    fn email_scenario() {
        let field = FieldDescriptor::new("email", "Email", FieldKind::Email).required();
        assert_eq!(check(&field, "").as_deref(), Some("Email is required"));
        assert_eq!(check(&field, "a@b").as_deref(), Some("Invalid email address"));
        assert_eq!(check(&field, "a b@c.com").as_deref(), Some("Invalid email address"));
        assert_eq!(check(&field, "a@b.com"), None);
    }

    #[test]
    fn surrounding_whitespace_is_not_trimmed_away() {
        let email = FieldDescriptor::new("email", "Email", FieldKind::Email).required();
        assert_eq!(check(&email, " a@b.com").as_deref(), Some("Invalid email address"));
        assert_eq!(check(&email, "a@b.com ").as_deref(), Some("Invalid email address"));

        let phone = FieldDescriptor::new("phone", "Phone", FieldKind::Tel);
        assert_eq!(
            check(&phone, " 555-123-4567 ").as_deref(),
            Some("Invalid phone number")
        );
        assert_eq!(check(&phone, "555-123-4567"), None);
    }

    #[test]
    fn url_must_be_absolute() {
        let field = FieldDescriptor::new("site", "Site", FieldKind::Url);
        assert_eq!(check(&field, "example.com").as_deref(), Some("Invalid URL"));
        assert_eq!(check(&field, "/relative/path").as_deref(), Some("Invalid URL"));
        assert_eq!(check(&field, "https://example.com/queue"), None);
        assert_eq!(check(&field, "sip:agent@pbx.local"), None);
    }

    #[test]
    fn phone_numbers() {
        let field = FieldDescriptor::new("phone", "Phone", FieldKind::Tel);
        for ok in [
            "+1 (555) 123-4567",
            "555-123-4567",
            "(555) 123 4567",
            "+256 414 123456",
            "555.123.4567",
        ] {
            assert_eq!(check(&field, ok), None, "{ok} should be accepted");
        }
        for bad in ["12", "555-CALL-NOW", "++1 555 1234567", "phone"] {
            assert_eq!(
                check(&field, bad).as_deref(),
                Some("Invalid phone number"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn age_bounds_scenario() {
        let field = FieldDescriptor::new("age", "Age", FieldKind::Number)
            .constraints(Constraints::default().with_range(Some(18.0), Some(65.0)));
        assert_eq!(check(&field, 17.0).as_deref(), Some("Age must be at least 18"));
        assert_eq!(check(&field, 70.0).as_deref(), Some("Age must be at most 65"));
        assert_eq!(check(&field, 30.0), None);
        // Number inputs typed as text are compared numerically.
        assert_eq!(check(&field, "17").as_deref(), Some("Age must be at least 18"));
    }

    #[test]
    fn contradictory_bounds_check_min_before_max() {
        let field = FieldDescriptor::new("n", "Level", FieldKind::Number)
            .constraints(Constraints::default().with_range(Some(10.0), Some(5.0)));
        assert_eq!(check(&field, 20.0).as_deref(), Some("Level must be at most 5"));
        assert_eq!(check(&field, 7.0).as_deref(), Some("Level must be at least 10"));
    }

    #[test]
    fn non_numeric_number_input() {
        let field = FieldDescriptor::new("ext", "Extension", FieldKind::Number);
        assert_eq!(
            check(&field, "12a").as_deref(),
            Some("Extension must be a valid number")
        );
    }

    #[test]
    fn bounds_ignored_for_non_number_kinds() {
        let field = FieldDescriptor::new("code", "Code", FieldKind::Text)
            .constraints(Constraints::default().with_range(Some(100.0), None));
        assert_eq!(check(&field, "5"), None);
    }

    #[test]
    fn pattern_then_lengths_then_custom() {
        let field = FieldDescriptor::new("ticket", "Ticket", FieldKind::Text).constraints(
            Constraints::default()
                .with_pattern(r"^T-\d+$")
                .unwrap()
                .with_length(Some(4), Some(6))
                .with_custom(|v| {
                    (v.as_str() == Some("T-000")).then(|| "Ticket T-000 is reserved".to_string())
                }),
        );

        assert_eq!(check(&field, "X-1").as_deref(), Some("Ticket format is invalid"));
        assert_eq!(
            check(&field, "T-1").as_deref(),
            Some("Ticket must be at least 4 characters")
        );
        assert_eq!(
            check(&field, "T-12345").as_deref(),
            Some("Ticket must be at most 6 characters")
        );
        assert_eq!(check(&field, "T-000").as_deref(), Some("Ticket T-000 is reserved"));
        assert_eq!(check(&field, "T-42"), None);
    }

    #[test]
    fn lengths_count_characters() {
        let field = FieldDescriptor::new("n", "Name", FieldKind::Text)
            .constraints(Constraints::default().with_length(None, Some(3)));
        assert_eq!(check(&field, "äöü"), None);
    }

    #[test]
    fn custom_runs_for_lists() {
        let field = FieldDescriptor::new("skills", "Skills", FieldKind::Multiselect).constraints(
            Constraints::default().with_custom(|v| {
                (v.as_list().map(<[String]>::len).unwrap_or(0) > 2)
                    .then(|| "Pick at most two skills".to_string())
            }),
        );
        assert_eq!(check(&field, FieldValue::list(["a", "b"])), None);
        assert_eq!(
            check(&field, FieldValue::list(["a", "b", "c"])).as_deref(),
            Some("Pick at most two skills")
        );
    }

    #[test]
    fn hidden_fields_never_reported() {
        let fields = vec![
            FieldDescriptor::new("country", "Country", FieldKind::Select).required(),
            FieldDescriptor::new("state", "State", FieldKind::Select)
                .required()
                .show_when(|v| v.get("country").and_then(FieldValue::as_str) == Some("US")),
        ];

        let mut values = Values::new();
        values.insert("country".into(), FieldValue::text("UG"));
        values.insert("state".into(), FieldValue::text(""));
        let result = validate_form(&fields, &values);
        assert!(result.is_valid());
        assert_eq!(result.error("state"), None);

        values.insert("country".into(), FieldValue::text("US"));
        let result = validate_form(&fields, &values);
        assert!(!result.is_valid());
        assert_eq!(result.error("state"), Some("State is required"));
    }

    #[test]
    fn form_missing_value_counts_as_empty() {
        let fields = vec![FieldDescriptor::new("name", "Name", FieldKind::Text).required()];
        let result = validate_form(&fields, &Values::new());
        assert_eq!(result.error("name"), Some("Name is required"));
    }
}
