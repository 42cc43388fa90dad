/// Registration input validation.
///
/// Failures become field errors for the client form, keyed by the offending
/// field, instead of GraphQL transport errors.
use crate::models::FieldError;
use async_graphql::InputObject;
use validator::Validate;

#[derive(Debug, Clone, InputObject, Validate)]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 8))]
    pub password: String,
}

/// Check a registration form; None means it passed
pub fn validate_register(input: &RegisterInput) -> Option<Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Err(validation) = input.validate() {
        let fields = validation.field_errors();
        if fields.contains_key("email") {
            errors.push(FieldError::new("email", "invalid email address"));
        }
        if fields.contains_key("username") {
            errors.push(FieldError::new(
                "username",
                "username must be 3 to 50 characters",
            ));
        }
        if fields.contains_key("password") {
            errors.push(FieldError::new(
                "password",
                "password must be at least 8 characters",
            ));
        }
    }

    // Usernames must stay distinguishable from emails at login
    if input.username.contains('@') {
        errors.push(FieldError::new(
            "username",
            "username cannot contain an @ sign",
        ));
    }

    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, username: &str, password: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_register(&input("user@example.com", "user1", "long enough")).is_none());
    }

    #[test]
    fn test_invalid_email() {
        let errors = validate_register(&input("not-an-email", "user1", "long enough")).unwrap();
        assert!(errors.iter().any(|e| e.field == "email"));
    }

    #[test]
    fn test_short_username() {
        let errors = validate_register(&input("user@example.com", "ab", "long enough")).unwrap();
        assert!(errors.iter().any(|e| e.field == "username"));
    }

    #[test]
    fn test_short_password() {
        let errors = validate_register(&input("user@example.com", "user1", "short")).unwrap();
        assert!(errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn test_username_with_at_sign() {
        let errors = validate_register(&input("user@example.com", "user@1", "long enough")).unwrap();
        assert!(errors
            .iter()
            .any(|e| e.field == "username" && e.message.contains("@")));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let errors = validate_register(&input("bad", "a@", "x")).unwrap();
        assert!(errors.len() >= 3);
    }
}
