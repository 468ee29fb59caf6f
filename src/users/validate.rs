use lazy_static::lazy_static;
use regex::Regex;

use super::dto::CreateUserRequest;
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_name(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().chars().count() < 2 {
        return Err(ApiError::Validation {
            field,
            rule: "must be at least 2 characters",
        });
    }
    Ok(())
}

/// Structural rules on submitted user data. The first violated rule wins
/// and names the offending field.
pub fn validate_new_user(req: &CreateUserRequest) -> Result<(), ApiError> {
    check_name("firstName", &req.first_name)?;
    check_name("lastName", &req.last_name)?;

    if req.email.is_empty() || !is_valid_email(&req.email) {
        return Err(ApiError::Validation {
            field: "email",
            rule: "must be a valid email address",
        });
    }

    if req.password.is_empty() {
        return Err(ApiError::Validation {
            field: "password",
            rule: "must not be empty",
        });
    }
    if req.repeat_password != req.password {
        return Err(ApiError::Validation {
            field: "repeatPassword",
            rule: "must match password",
        });
    }
    if req.password.len() < 8 {
        return Err(ApiError::Validation {
            field: "password",
            rule: "must be at least 8 characters",
        });
    }

    Ok(())
}
