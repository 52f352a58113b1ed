use super::types::RegisterRequest;
use crate::shared::{AppError, FieldErrors};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Checks a registration payload, collecting every problem rather than
/// stopping at the first one
pub fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();

    if request.username.trim().is_empty() {
        errors.insert("username".to_string(), "username is required".to_string());
    }

    if request.email.trim().is_empty() {
        errors.insert("email".to_string(), "email is required".to_string());
    } else if !is_valid_email(&request.email) {
        errors.insert("email".to_string(), "Invalid email format".to_string());
    }

    if request.password.is_empty() {
        errors.insert("password".to_string(), "password is required".to_string());
    } else if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.insert(
            "password".to_string(),
            format!("password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidFields(errors))
    }
}

/// Single `@`, non-empty local part, dotted domain without empty labels
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
