//! Login and register form validation.
//!
//! Validation failures never reach the network; the host turns a
//! [`FormError`] into an error toast and stops.

use serde::Serialize;
use std::fmt;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingFields,
    InvalidEmail,
    PasswordTooShort,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingFields => write!(f, "Please fill in all fields"),
            FormError::InvalidEmail => write!(f, "Please enter a valid email address"),
            FormError::PasswordTooShort => {
                write!(f, "Password must be at least 6 characters long")
            }
        }
    }
}

impl std::error::Error for FormError {}

/// Structural email check: exactly one `@`, non-empty local part, dotted
/// domain, no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tld)) => !head.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Both fields required; no shape checks beyond that on login.
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// "artisan" or "customer".
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.role.trim().is_empty()
        {
            return Err(FormError::MissingFields);
        }
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(FormError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            role: self.role.trim().to_string(),
        })
    }
}
