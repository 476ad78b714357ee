//! Payload validation for registration and login.
//!
//! Pure functions with no I/O: every outcome is a returned value and the
//! caller surfaces the message verbatim. Rules run in a fixed order and the
//! first failure wins; only the missing-fields rule aggregates.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Registration payload as submitted by the client.
///
/// `dob` keeps its raw JSON form: clients send it as a string or a number
/// and presence is judged by truthiness, not type.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>)]
    pub dob: Option<Value>,
    pub password: Option<String>,
    pub face_data: Option<String>,
    pub fingerprint_data: Option<String>,
}

/// Login payload; name, dob and phone are not required for login.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub face_data: Option<String>,
    pub fingerprint_data: Option<String>,
}

const PASSWORD_SPECIALS: &str = r#"!@#$%^&*()_+={}|[]\:";'<>,.?/~"#;

/// Validate a registration payload.
///
/// # Errors
///
/// Returns the user-facing message of the first failing rule.
pub fn validate_register_input(input: &RegisterInput) -> Result<(), String> {
    let mut missing = Vec::new();
    if missing_str(&input.name) {
        missing.push("name");
    }
    if missing_str(&input.email) {
        missing.push("email");
    }
    if missing_str(&input.phone) {
        missing.push("phone");
    }
    if missing_value(&input.dob) {
        missing.push("dob");
    }
    if missing_str(&input.password) {
        missing.push("password");
    }
    if missing_str(&input.face_data) {
        missing.push("face_data");
    }
    if missing_str(&input.fingerprint_data) {
        missing.push("fingerprint_data");
    }
    if !missing.is_empty() {
        return Err(format!("Missing required fields: {}", missing.join(", ")));
    }

    if !valid_name(input.name.as_deref().unwrap_or_default()) {
        return Err(
            "Name must start with a capital letter and have at least 3 characters".to_string(),
        );
    }

    if !valid_email(input.email.as_deref().unwrap_or_default()) {
        return Err("Please enter a valid email address".to_string());
    }

    if !valid_phone(input.phone.as_deref().unwrap_or_default()) {
        return Err("Phone number must be 10 digits".to_string());
    }

    if !valid_password(input.password.as_deref().unwrap_or_default()) {
        return Err(
            "Password must be at least 6 characters, contain one letter, one number, and one special character"
                .to_string(),
        );
    }

    Ok(())
}

/// Validate a login payload. Presence only, no format checks.
///
/// # Errors
///
/// Returns the user-facing message of the first failing rule.
pub fn validate_login_input(input: &LoginInput) -> Result<(), String> {
    if missing_str(&input.email) || missing_str(&input.password) {
        return Err("Email and password are required".to_string());
    }

    if missing_str(&input.face_data) {
        return Err("Face biometric data is required for login".to_string());
    }

    if missing_str(&input.fingerprint_data) {
        return Err("Fingerprint biometric data is required for login".to_string());
    }

    Ok(())
}

fn missing_str(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

// Truthiness of the submitted JSON value: null, "", 0 and false all count
// as missing.
fn missing_value(field: &Option<Value>) -> bool {
    match field {
        None | Some(Value::Null) => true,
        Some(Value::Bool(value)) => !value,
        Some(Value::String(value)) => value.is_empty(),
        Some(Value::Number(value)) => value.as_f64().map_or(false, |number| number == 0.0),
        Some(_) => false,
    }
}

// Starts with one uppercase ASCII letter followed by at least 2 more letters
fn valid_name(name: &str) -> bool {
    Regex::new(r"^[A-Z][a-zA-Z]{2,}$").is_ok_and(|re| re.is_match(name))
}

fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

fn valid_phone(phone: &str) -> bool {
    Regex::new(r"^[0-9]{10}$").is_ok_and(|re| re.is_match(phone))
}

// Independent conditions, not positional
fn valid_password(password: &str) -> bool {
    password.chars().count() >= 6
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_input() -> RegisterInput {
        RegisterInput {
            name: Some("Abcde".to_string()),
            email: Some("a@b.com".to_string()),
            phone: Some("1234567890".to_string()),
            dob: Some(json!("2000-01-01")),
            password: Some("abc1!2".to_string()),
            face_data: Some("x".to_string()),
            fingerprint_data: Some("y".to_string()),
        }
    }

    fn login_input() -> LoginInput {
        LoginInput {
            email: Some("a@b.com".to_string()),
            password: Some("abc1!2".to_string()),
            face_data: Some("x".to_string()),
            fingerprint_data: Some("y".to_string()),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        assert_eq!(validate_register_input(&register_input()), Ok(()));
    }

    #[test]
    fn all_missing_fields_listed_in_canonical_order() {
        let result = validate_register_input(&RegisterInput::default());

        assert_eq!(
            result,
            Err(
                "Missing required fields: name, email, phone, dob, password, face_data, fingerprint_data"
                    .to_string()
            )
        );
    }

    #[test]
    fn missing_fields_aggregate_only_the_absent_ones() {
        let input = RegisterInput {
            phone: None,
            password: Some(String::new()),
            ..register_input()
        };

        assert_eq!(
            validate_register_input(&input),
            Err("Missing required fields: phone, password".to_string())
        );
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let input = RegisterInput {
            name: Some(String::new()),
            ..register_input()
        };

        assert_eq!(
            validate_register_input(&input),
            Err("Missing required fields: name".to_string())
        );
    }

    #[test]
    fn falsy_dob_counts_as_missing() {
        for dob in [json!(null), json!(""), json!(0), json!(0.0), json!(false)] {
            let input = RegisterInput {
                dob: Some(dob),
                ..register_input()
            };

            assert_eq!(
                validate_register_input(&input),
                Err("Missing required fields: dob".to_string())
            );
        }
    }

    #[test]
    fn truthy_non_string_dob_is_accepted() {
        let input = RegisterInput {
            dob: Some(json!(19991231)),
            ..register_input()
        };

        assert_eq!(validate_register_input(&input), Ok(()));
    }

    #[test]
    fn short_lowercase_name_is_rejected() {
        let input = RegisterInput {
            name: Some("ab".to_string()),
            ..register_input()
        };

        assert_eq!(
            validate_register_input(&input),
            Err("Name must start with a capital letter and have at least 3 characters".to_string())
        );
    }

    #[test]
    fn name_with_digits_is_rejected() {
        let input = RegisterInput {
            name: Some("Ab3".to_string()),
            ..register_input()
        };

        assert!(validate_register_input(&input).is_err());
    }

    #[test]
    fn three_letter_capitalized_name_is_accepted() {
        let input = RegisterInput {
            name: Some("Abc".to_string()),
            ..register_input()
        };

        assert_eq!(validate_register_input(&input), Ok(()));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let input = RegisterInput {
            email: Some("not-an-email".to_string()),
            ..register_input()
        };

        assert_eq!(
            validate_register_input(&input),
            Err("Please enter a valid email address".to_string())
        );
    }

    #[test]
    fn phone_must_be_exactly_ten_digits() {
        for phone in ["12345", "12345678901", "123456789a", "123-456-789"] {
            let input = RegisterInput {
                phone: Some(phone.to_string()),
                ..register_input()
            };

            assert_eq!(
                validate_register_input(&input),
                Err("Phone number must be 10 digits".to_string())
            );
        }
    }

    #[test]
    fn weak_passwords_are_rejected() {
        // no digit and no special, no special, no letter, too short
        for password in ["abcdef", "abc123", "123!@#", "a1!"] {
            let input = RegisterInput {
                password: Some(password.to_string()),
                ..register_input()
            };

            assert_eq!(
                validate_register_input(&input),
                Err(
                    "Password must be at least 6 characters, contain one letter, one number, and one special character"
                        .to_string()
                )
            );
        }
    }

    #[test]
    fn rule_order_is_fixed() {
        // Both name and phone are malformed; the name rule fires first
        let input = RegisterInput {
            name: Some("ab".to_string()),
            phone: Some("12345".to_string()),
            ..register_input()
        };

        assert_eq!(
            validate_register_input(&input),
            Err("Name must start with a capital letter and have at least 3 characters".to_string())
        );
    }

    #[test]
    fn accepts_valid_login() {
        assert_eq!(validate_login_input(&login_input()), Ok(()));
    }

    #[test]
    fn login_checks_credentials_before_biometrics() {
        let input = LoginInput {
            password: Some(String::new()),
            ..login_input()
        };

        assert_eq!(
            validate_login_input(&input),
            Err("Email and password are required".to_string())
        );
    }

    #[test]
    fn login_requires_face_data() {
        let input = LoginInput {
            face_data: None,
            ..login_input()
        };

        assert_eq!(
            validate_login_input(&input),
            Err("Face biometric data is required for login".to_string())
        );
    }

    #[test]
    fn login_requires_fingerprint_data() {
        let input = LoginInput {
            fingerprint_data: Some(String::new()),
            ..login_input()
        };

        assert_eq!(
            validate_login_input(&input),
            Err("Fingerprint biometric data is required for login".to_string())
        );
    }

    #[test]
    fn login_format_is_not_checked() {
        let input = LoginInput {
            email: Some("not-an-email".to_string()),
            password: Some("x".to_string()),
            ..login_input()
        };

        assert_eq!(validate_login_input(&input), Ok(()));
    }

    #[test]
    fn validators_are_idempotent() {
        let register = RegisterInput {
            phone: Some("12345".to_string()),
            ..register_input()
        };
        let login = login_input();

        assert_eq!(
            validate_register_input(&register),
            validate_register_input(&register)
        );
        assert_eq!(validate_login_input(&login), validate_login_input(&login));
    }
}
