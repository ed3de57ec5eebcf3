//! Authentication form state and client-side validation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length for company accounts
const MIN_PASSWORD_LENGTH: usize = 8;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const EMAIL_INVALID: &str = "Email is invalid";
pub const PASSWORD_WEAK: &str =
    "Password must be at least 8 characters with a digit, a lowercase and an uppercase letter";
pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const PROVIDER_TOKEN_REQUIRED: &str = "Identity provider token is required";

/// local-part `@` domain, followed by at least one `.tld` label
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)+$")
        .expect("email pattern is a valid regex")
});

// ============================================================================
// Validation
// ============================================================================

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// At least 8 characters with a digit, a lowercase and an uppercase letter
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    FirstName,
    LastName,
    ProviderToken,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::FirstName => "first name",
            Field::LastName => "last name",
            Field::ProviderToken => "provider token",
        };
        write!(f, "{}", name)
    }
}

/// Field-level validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn require(&mut self, field: Field, value: &str, message: &str) -> bool {
        if value.is_empty() {
            self.insert(field, message);
            false
        } else {
            true
        }
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// ============================================================================
// Form state
// ============================================================================

/// Status shared by every authentication form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStatus {
    pub errors: FieldErrors,
    pub submitting: bool,
    /// Most recent backend failure; a new failure replaces the old one
    pub back_error: Option<String>,
}

impl FormStatus {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub status: FormStatus,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            status: FormStatus::default(),
        }
    }

    /// Both fields must be filled in
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require(Field::Email, &self.email, EMAIL_REQUIRED);
        errors.require(Field::Password, &self.password, PASSWORD_REQUIRED);
        errors.into_result()
    }

    /// Clear inputs and status, as on leaving the page
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeekerRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub status: FormStatus,
}

impl SeekerRegistration {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            status: FormStatus::default(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require(Field::FirstName, &self.first_name, FIRST_NAME_REQUIRED);
        errors.require(Field::LastName, &self.last_name, LAST_NAME_REQUIRED);
        errors.require(Field::Email, &self.email, EMAIL_REQUIRED);
        errors.require(Field::Password, &self.password, PASSWORD_REQUIRED);
        errors.into_result()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    pub email: String,
    pub password: String,
    pub status: FormStatus,
}

impl CompanyForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            status: FormStatus::default(),
        }
    }

    /// Email must be well-formed and the password strong
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if errors.require(Field::Email, &self.email, EMAIL_REQUIRED) && !is_valid_email(&self.email) {
            errors.insert(Field::Email, EMAIL_INVALID);
        }
        if errors.require(Field::Password, &self.password, PASSWORD_REQUIRED)
            && !is_strong_password(&self.password)
        {
            errors.insert(Field::Password, PASSWORD_WEAK);
        }
        errors.into_result()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub(crate) fn validate_provider_token(token: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require(Field::ProviderToken, token.trim(), PROVIDER_TOKEN_REQUIRED);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Abcdefg1"));
        assert!(!is_strong_password("abcdefg1")); // no uppercase
        assert!(!is_strong_password("ABCDEFG1")); // no lowercase
        assert!(!is_strong_password("Abcdefgh")); // no digit
        assert!(!is_strong_password("Ab1")); // too short
        assert!(!is_strong_password(""));
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("hr@acme.io"));
        assert!(is_valid_email("first.last+jobs@mail.example.com"));
        assert!(!is_valid_email("hr@acme"));
        assert!(!is_valid_email("hr.acme.io"));
        assert!(!is_valid_email("@acme.io"));
        assert!(!is_valid_email("hr@.io"));
        assert!(!is_valid_email("hr@acme.io "));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let errors = LoginForm::new("", "").validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(EMAIL_REQUIRED));
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_REQUIRED));

        let errors = LoginForm::new("a@b.co", "").validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), None);
        assert_eq!(errors.len(), 1);

        assert!(LoginForm::new("a@b.co", "x").validate().is_ok());
    }

    #[test]
    fn test_company_form_validation() {
        let errors = CompanyForm::new("not-an-email", "weak").validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(EMAIL_INVALID));
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_WEAK));

        let errors = CompanyForm::new("", "").validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(EMAIL_REQUIRED));
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_REQUIRED));

        assert!(CompanyForm::new("hr@acme.io", "Abcdefg1").validate().is_ok());
    }

    #[test]
    fn test_seeker_registration_requires_all_fields() {
        let errors = SeekerRegistration::new("", "Lee", "ann@mail.com", "pw")
            .validate()
            .unwrap_err();
        assert_eq!(errors.get(Field::FirstName), Some(FIRST_NAME_REQUIRED));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Password, PASSWORD_REQUIRED);
        errors.insert(Field::Email, EMAIL_REQUIRED);
        assert_eq!(
            errors.to_string(),
            "email: Email is required; password: Password is required"
        );
    }

    #[test]
    fn test_reset_clears_status() {
        let mut form = LoginForm::new("a@b.co", "pw");
        form.status.submitting = true;
        form.status.back_error = Some("!Invalid user".to_string());
        form.reset();
        assert!(form.email.is_empty());
        assert_eq!(form.status, FormStatus::default());
    }

    #[test]
    fn test_provider_token_required() {
        assert!(validate_provider_token("   ").is_err());
        assert!(validate_provider_token("google-id-token").is_ok());
    }
}
