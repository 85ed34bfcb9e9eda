//! Account onboarding form with client-side validation.

use crate::models::account::AccountType;
use crate::models::validation::{ValidationError, MIN_PASSWORD_LENGTH};

/// An image captured or selected during onboarding (identity document or
/// liveness selfie).
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Profile fields and credentials collected by the registration screen.
///
/// [`RegistrationForm::validate`] must pass before the form is submitted;
/// the API client enforces this and never sends an invalid form over the
/// network.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub contact: String,
    pub area: String,
    pub plot_number: String,
    pub account_type: AccountType,
    pub is_international: bool,
    pub id_document: Option<Attachment>,
    pub selfie: Option<Attachment>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }
}
