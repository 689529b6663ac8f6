//! Form validation
//!
//! Validators return translation keys (under the `auth` namespace) so the
//! views can show messages in the active locale.

use super::{Credentials, RegisterRequest};
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Fields of the login and register forms
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthField {
    Name,
    Email,
    Password,
}

/// One failed rule: the field and the message key
pub type FieldError = (AuthField, &'static str);

/// Loose email shape: some text, `@`, some text, `.`, some text, with no
/// whitespace in between.
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email pattern"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push((AuthField::Email, "email_required"));
    } else if !is_valid_email(email) {
        errors.push((AuthField::Email, "email_invalid"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push((AuthField::Password, "password_required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push((AuthField::Password, "password_too_short"));
    }
}

pub fn validate_login(credentials: &Credentials) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_email(&credentials.email, &mut errors);
    check_password(&credentials.password, &mut errors);
    errors
}

pub fn validate_register(request: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if request.name.trim().is_empty() {
        errors.push((AuthField::Name, "name_required"));
    }
    check_email(&request.email, &mut errors);
    check_password(&request.password, &mut errors);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("  ana@mail.co  "));
        assert!(is_valid_email("a@b.c."));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("ana@example."));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_login_rules() {
        let errors = validate_login(&Credentials {
            email: String::new(),
            password: "123".into(),
        });
        assert_eq!(
            errors,
            vec![
                (AuthField::Email, "email_required"),
                (AuthField::Password, "password_too_short")
            ]
        );

        let ok = validate_login(&Credentials {
            email: "ana@example.com".into(),
            password: "secreto".into(),
        });
        assert!(ok.is_empty());
    }

    #[test]
    fn test_register_rules() {
        let errors = validate_register(&RegisterRequest {
            name: "  ".into(),
            email: "nope".into(),
            password: String::new(),
        });
        assert_eq!(
            errors,
            vec![
                (AuthField::Name, "name_required"),
                (AuthField::Email, "email_invalid"),
                (AuthField::Password, "password_required")
            ]
        );
    }
}
