//! User payload validation
//!
//! Payloads are checked as raw JSON so that every offending field can be
//! reported at once, before anything touches the store.

use serde_json::{Map, Value};
use validator::ValidateEmail;

use super::entity::{NewUser, UserChanges};
use crate::domain::error::{DomainError, FieldViolation};

const EMAIL_FIELD: &str = "email";
const NAME_FIELD: &str = "name";

/// Check email syntax
///
/// Uses the HTML5 rules from `validator` and additionally requires a dotted
/// domain, so `user@localhost` is rejected.
pub fn validate_email(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }

    match email.rsplit_once('@') {
        Some((_, domain)) => {
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Validate a create payload into a [`NewUser`]
///
/// Rules:
/// - `email` is required and must be a valid email address
/// - `name` is optional; when present and non-null it must be a string
pub fn validate_create_payload(payload: &Value) -> Result<NewUser, DomainError> {
    let object = as_object(payload)?;
    let mut violations = Vec::new();

    let email = match object.get(EMAIL_FIELD) {
        None | Some(Value::Null) => {
            violations.push(email_violation());
            None
        }
        Some(value) => check_email(value, &mut violations),
    };

    let name = match object.get(NAME_FIELD) {
        None | Some(Value::Null) => None,
        Some(value) => check_name(value, &mut violations),
    };

    match email {
        Some(email) if violations.is_empty() => Ok(NewUser::new(email, name)),
        _ => Err(DomainError::invalid_fields(violations)),
    }
}

/// Validate a partial update payload into [`UserChanges`]
///
/// Every field is optional and an empty object is a valid no-op. An explicit
/// `"name": null` clears the name; `"email": null` is rejected because the
/// email column is required.
pub fn validate_update_payload(payload: &Value) -> Result<UserChanges, DomainError> {
    let object = as_object(payload)?;
    let mut violations = Vec::new();
    let mut changes = UserChanges::default();

    match object.get(EMAIL_FIELD) {
        None => {}
        Some(Value::Null) => violations.push(FieldViolation::new(
            EMAIL_FIELD,
            "email must not be null",
        )),
        Some(value) => changes.email = check_email(value, &mut violations),
    }

    match object.get(NAME_FIELD) {
        None => {}
        Some(Value::Null) => changes.name = Some(None),
        Some(value) => {
            if let Some(name) = check_name(value, &mut violations) {
                changes.name = Some(Some(name));
            }
        }
    }

    if violations.is_empty() {
        Ok(changes)
    } else {
        Err(DomainError::invalid_fields(violations))
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, DomainError> {
    payload
        .as_object()
        .ok_or_else(|| DomainError::validation("Request body must be a JSON object"))
}

fn email_violation() -> FieldViolation {
    FieldViolation::new(EMAIL_FIELD, "email must be an email")
}

fn check_email(value: &Value, violations: &mut Vec<FieldViolation>) -> Option<String> {
    match value.as_str() {
        Some(email) if validate_email(email) => Some(email.to_string()),
        _ => {
            violations.push(email_violation());
            None
        }
    }
}

fn check_name(value: &Value, violations: &mut Vec<FieldViolation>) -> Option<String> {
    match value.as_str() {
        Some(name) => Some(name.to_string()),
        None => {
            violations.push(FieldViolation::new(NAME_FIELD, "name must be a string"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn violation_fields(err: DomainError) -> Vec<String> {
        match err {
            DomainError::Validation { violations, .. } => {
                violations.into_iter().map(|v| v.field).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("a@b.com"));
        assert!(validate_email("john.doe+tag@example.co.uk"));
        assert!(validate_email("user_1@sub.domain.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!validate_email(""));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("@b.com"));
        assert!(!validate_email("a@"));
        assert!(!validate_email("a b@c.com"));
        assert!(!validate_email("user@localhost"));
    }

    #[test]
    fn test_create_with_email_only() {
        let new_user = validate_create_payload(&json!({"email": "a@b.com"})).unwrap();

        assert_eq!(new_user.email, "a@b.com");
        assert!(new_user.name.is_none());
    }

    #[test]
    fn test_create_with_name() {
        let new_user =
            validate_create_payload(&json!({"email": "a@b.com", "name": "John Doe"})).unwrap();

        assert_eq!(new_user.name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn test_create_null_name_is_absent() {
        let new_user = validate_create_payload(&json!({"email": "a@b.com", "name": null})).unwrap();
        assert!(new_user.name.is_none());
    }

    #[test]
    fn test_create_ignores_unknown_fields() {
        let new_user =
            validate_create_payload(&json!({"email": "a@b.com", "role": "admin"})).unwrap();
        assert_eq!(new_user.email, "a@b.com");
    }

    #[test]
    fn test_create_missing_email() {
        let err = validate_create_payload(&json!({"name": "John"})).unwrap_err();
        assert_eq!(violation_fields(err), vec!["email"]);
    }

    #[test]
    fn test_create_malformed_email() {
        let err = validate_create_payload(&json!({"email": "not-an-email"})).unwrap_err();
        assert_eq!(violation_fields(err), vec!["email"]);
    }

    #[test]
    fn test_create_non_string_email() {
        let err = validate_create_payload(&json!({"email": 12})).unwrap_err();
        assert_eq!(violation_fields(err), vec!["email"]);
    }

    #[test]
    fn test_create_reports_every_field() {
        let err = validate_create_payload(&json!({"email": "nope", "name": 42})).unwrap_err();
        assert_eq!(violation_fields(err), vec!["email", "name"]);
    }

    #[test]
    fn test_create_valid_email_bad_name() {
        let err = validate_create_payload(&json!({"email": "a@b.com", "name": ["x"]})).unwrap_err();
        assert_eq!(violation_fields(err), vec!["name"]);
    }

    #[test]
    fn test_create_rejects_non_object() {
        for payload in [json!([]), json!("a@b.com"), json!(null), json!(1)] {
            let err = validate_create_payload(&payload).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_update_empty_is_noop() {
        let changes = validate_update_payload(&json!({})).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_update_partial_fields() {
        let changes = validate_update_payload(&json!({"name": "Jane"})).unwrap();
        assert!(changes.email.is_none());
        assert_eq!(changes.name, Some(Some("Jane".to_string())));

        let changes = validate_update_payload(&json!({"email": "c@d.com"})).unwrap();
        assert_eq!(changes.email.as_deref(), Some("c@d.com"));
        assert!(changes.name.is_none());
    }

    #[test]
    fn test_update_null_name_clears() {
        let changes = validate_update_payload(&json!({"name": null})).unwrap();
        assert_eq!(changes.name, Some(None));
    }

    #[test]
    fn test_update_rejects_bad_fields() {
        let err = validate_update_payload(&json!({"email": "bad"})).unwrap_err();
        assert_eq!(violation_fields(err), vec!["email"]);

        let err = validate_update_payload(&json!({"email": null})).unwrap_err();
        assert_eq!(violation_fields(err), vec!["email"]);

        let err = validate_update_payload(&json!({"name": false})).unwrap_err();
        assert_eq!(violation_fields(err), vec!["name"]);
    }

    #[test]
    fn test_update_rejects_non_object() {
        assert!(validate_update_payload(&json!([1, 2])).is_err());
    }
}
