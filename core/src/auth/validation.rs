use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use super::{DEFAULT_DISPLAY_NAME, MIN_NAME_LEN, MIN_PASSWORD_LEN};
use crate::state::Session;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_RE is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every rule a form broke, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    let email = email.trim();
    if email.is_empty() {
        errors.push(FieldError {
            field: "email",
            message: "Email is required".to_string(),
        });
    } else if !email_regex().is_match(email) {
        errors.push(FieldError {
            field: "email",
            message: "Invalid email address".to_string(),
        });
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError {
            field: "password",
            message: "Password is required".to_string(),
        });
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError {
            field: "password",
            message: format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    pub fn into_session(self) -> Result<Session, ValidationErrors> {
        self.validate()?;
        Ok(Session::stamped(DEFAULT_DISPLAY_NAME, self.email.trim()))
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            errors.push(FieldError {
                field: "name",
                message: format!("Name must be at least {MIN_NAME_LEN} characters"),
            });
        }
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        if self.confirm_password != self.password {
            errors.push(FieldError {
                field: "confirm_password",
                message: "Passwords must match".to_string(),
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    pub fn into_session(self) -> Result<Session, ValidationErrors> {
        self.validate()?;
        Ok(Session::stamped(self.name.trim(), self.email.trim()))
    }
}
