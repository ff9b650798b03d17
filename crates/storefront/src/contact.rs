//! Contact form validation.
//!
//! Stateless predicates over the three contact form fields. Each returns the
//! fixed message shown next to the field when it fails.

use serde::Deserialize;
use tienda_core::Email;

/// Minimum trimmed length of the name field.
pub const MIN_NAME_CHARS: usize = 3;

/// Minimum trimmed length of the message field.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Raw contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Per-field validation messages. `None` means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl FieldErrors {
    /// Whether every field passed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

/// Validate the name field.
///
/// # Errors
///
/// Returns the field message if the trimmed name is empty or shorter than
/// [`MIN_NAME_CHARS`].
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        Err("Please enter your full name.")
    } else if name.chars().count() < MIN_NAME_CHARS {
        Err("Name must be at least 3 characters.")
    } else {
        Ok(())
    }
}

/// Validate the email field.
///
/// Emptiness is checked on the trimmed value; the address itself must parse
/// as an [`Email`] as typed.
///
/// # Errors
///
/// Returns the field message if the email is empty or malformed.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        Err("Please enter your email address.")
    } else if Email::parse(email).is_err() {
        Err("Please enter a valid email address.")
    } else {
        Ok(())
    }
}

/// Validate the message field.
///
/// # Errors
///
/// Returns the field message if the trimmed message is empty or shorter than
/// [`MIN_MESSAGE_CHARS`].
pub fn validate_message(message: &str) -> Result<(), &'static str> {
    let message = message.trim();
    if message.is_empty() {
        Err("Please enter your message.")
    } else if message.chars().count() < MIN_MESSAGE_CHARS {
        Err("Message must be at least 10 characters.")
    } else {
        Ok(())
    }
}

/// Validate every field of `form`, collecting all failures.
///
/// # Errors
///
/// Returns the messages of every failing field.
pub fn validate_contact_form(form: &ContactForm) -> Result<(), FieldErrors> {
    let errors = FieldErrors {
        name: validate_name(&form.name).err(),
        email: validate_email(&form.email).err(),
        message: validate_message(&form.message).err(),
    };

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("   "), Err("Please enter your full name."));
        assert_eq!(validate_name(" Al "), Err("Name must be at least 3 characters."));
        assert_eq!(validate_name("Ana"), Ok(()));
    }

    #[test]
    fn test_validate_name_counts_characters_not_bytes() {
        assert_eq!(validate_name("Íñ"), Err("Name must be at least 3 characters."));
        assert_eq!(validate_name("Iñé"), Ok(()));
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(""), Err("Please enter your email address."));
        assert_eq!(validate_email("  "), Err("Please enter your email address."));
        assert_eq!(validate_email("ana@"), Err("Please enter a valid email address."));
        assert_eq!(validate_email("ana@shop"), Err("Please enter a valid email address."));
        assert_eq!(validate_email("ana@shop.com"), Ok(()));
    }

    #[test]
    fn test_validate_email_accepts_long_addresses() {
        let email = format!("{}@{}.com", "a".repeat(200), "b".repeat(200));
        assert_eq!(validate_email(&email), Ok(()));
    }

    #[test]
    fn test_validate_email_surrounding_whitespace_is_invalid() {
        assert_eq!(
            validate_email(" ana@shop.com"),
            Err("Please enter a valid email address.")
        );
    }

    #[test]
    fn test_validate_message() {
        assert_eq!(validate_message(""), Err("Please enter your message."));
        assert_eq!(
            validate_message("too short"),
            Err("Message must be at least 10 characters.")
        );
        assert_eq!(validate_message("  long enough  "), Ok(()));
    }

    #[test]
    fn test_validate_contact_form_reports_every_field() {
        let form = ContactForm {
            name: "A".to_string(),
            email: "nope".to_string(),
            message: String::new(),
        };

        let errors = validate_contact_form(&form).unwrap_err();

        assert_eq!(errors.name, Some("Name must be at least 3 characters."));
        assert_eq!(errors.email, Some("Please enter a valid email address."));
        assert_eq!(errors.message, Some("Please enter your message."));
    }

    #[test]
    fn test_validate_contact_form_ok() {
        let form = ContactForm {
            name: "Ana Pérez".to_string(),
            email: "ana@example.com".to_string(),
            message: "Do you ship to Canary Islands?".to_string(),
        };
        assert!(validate_contact_form(&form).is_ok());
    }
}
