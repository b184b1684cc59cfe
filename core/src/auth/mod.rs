//! Login and registration forms. A form that passes validation becomes a
//! `Session`; there is no remote authority behind it.

pub mod validation;

pub use validation::{FieldError, LoginForm, RegisterForm, ValidationErrors};

/// Display name given to sessions created through the login form.
pub const DEFAULT_DISPLAY_NAME: &str = "FitBuddy User";
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;
