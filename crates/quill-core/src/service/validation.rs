//! Structural input validation.

use crate::error::{DomainError, FieldErrors};

/// Outcome of validating user input: one message per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: FieldErrors,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.errors.insert(field, message.to_string());
        }
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DomainError::InvalidInput {
                errors: self.errors,
            })
        }
    }
}

/// Title, description and body must each contain something besides
/// whitespace. Shared by create and update.
pub fn validate_post_input(title: &str, desc: &str, body: &str) -> Validation {
    let mut validation = Validation::default();
    validation.require("title", title, "Title must not be empty");
    validation.require("desc", desc, "Description must not be empty");
    validation.require("body", body, "Body must not be empty");
    validation
}

/// Account registration input.
pub fn validate_registration(email: &str, password: &str, fullname: &str) -> Validation {
    let mut validation = Validation::default();
    validation.require("email", email, "Email must not be empty");
    if !email.trim().is_empty() && !email.contains('@') {
        validation
            .errors
            .insert("email", "Email must be a valid email address".to_string());
    }
    if password.chars().count() < 8 {
        validation.errors.insert(
            "password",
            "Password must be at least 8 characters".to_string(),
        );
    }
    validation.require("fullname", fullname, "Full name must not be empty");
    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_complete_input() {
        let validation = validate_post_input("Title", "Desc", "Body");
        assert!(validation.is_valid());
        assert!(validation.into_result().is_ok());
    }

    #[test]
    fn whitespace_only_fields_are_empty() {
        let validation = validate_post_input("  ", "\t", "\n");

        assert!(!validation.is_valid());
        assert_eq!(validation.errors.len(), 3);
        assert_eq!(validation.errors["title"], "Title must not be empty");
        assert_eq!(validation.errors["desc"], "Description must not be empty");
        assert_eq!(validation.errors["body"], "Body must not be empty");
    }

    #[test]
    fn reports_only_offending_fields() {
        let validation = validate_post_input("Title", "", "Body");
        assert_eq!(validation.errors.keys().copied().collect::<Vec<_>>(), ["desc"]);

        match validation.into_result() {
            Err(DomainError::InvalidInput { errors }) => assert!(errors.contains_key("desc")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn registration_rules() {
        assert!(validate_registration("ada@example.com", "longenough", "Ada").is_valid());

        let validation = validate_registration("not-an-email", "short", " ");
        assert_eq!(validation.errors.len(), 3);
        assert!(validation.errors["email"].contains("valid"));
        assert!(validation.errors.contains_key("password"));
        assert!(validation.errors.contains_key("fullname"));
    }
}
