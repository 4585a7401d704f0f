//! Checks applied to contact input before it is admitted to the store.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ContactInput, BIRTHDAY_FORMAT};

/// A single problem with submitted contact fields.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Phone number is required")]
    PhoneRequired,

    #[error("Birthday is required")]
    BirthdayRequired,

    #[error("Invalid birthday format")]
    InvalidBirthdayFormat,
}

/// Contact fields that passed validation, trimmed and parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub phone: String,
    pub birthday: NaiveDate,
}

/// Validate raw contact fields.
///
/// Every rule is checked and reported in order: name, phone, birthday. An
/// empty birthday is only reported as required; a non-empty one that is not
/// `YYYY-MM-DD` is only reported as badly formatted.
pub fn validate(name: &str, phone: &str, birthday: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push(ValidationError::NameRequired);
    }

    if phone.trim().is_empty() {
        errors.push(ValidationError::PhoneRequired);
    }

    if birthday.trim().is_empty() {
        errors.push(ValidationError::BirthdayRequired);
    } else if parse_birthday(birthday).is_none() {
        errors.push(ValidationError::InvalidBirthdayFormat);
    }

    errors
}

/// Same as [`validate`] but returns the user-facing messages.
pub fn validate_messages(name: &str, phone: &str, birthday: &str) -> Vec<String> {
    validate(name, phone, birthday)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Parse a `YYYY-MM-DD` birthday, ignoring surrounding whitespace.
pub fn parse_birthday(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), BIRTHDAY_FORMAT).ok()
}

impl ContactInput {
    pub fn validate(&self) -> Result<ValidContact, Vec<ValidationError>> {
        let errors = validate(&self.name, &self.phone, &self.birthday);
        if !errors.is_empty() {
            return Err(errors);
        }

        let birthday = parse_birthday(&self.birthday)
            .ok_or_else(|| vec![ValidationError::InvalidBirthdayFormat])?;

        Ok(ValidContact {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            birthday,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input_has_no_errors() {
        assert!(validate("Alice", "+1234567890", "1995-03-15").is_empty());
        assert!(validate("Bob", "5555555555", "2000-02-29").is_empty());
        assert!(validate("  Carol ", " 12 ", " 1988-12-25 ").is_empty());
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(
            validate("", "+1", "2000-01-01"),
            vec![ValidationError::NameRequired]
        );
        assert_eq!(
            validate("   ", "+1", "2000-01-01"),
            vec![ValidationError::NameRequired]
        );
    }

    #[test]
    fn test_missing_phone() {
        assert_eq!(
            validate("Ann", "\t", "2000-01-01"),
            vec![ValidationError::PhoneRequired]
        );
    }

    #[test]
    fn test_missing_birthday_is_only_required() {
        let errors = validate("Ann", "+1", "");
        assert_eq!(errors, vec![ValidationError::BirthdayRequired]);
        assert!(!errors.contains(&ValidationError::InvalidBirthdayFormat));
    }

    #[test]
    fn test_malformed_birthday_is_only_invalid_format() {
        for text in ["08/08/2000", "2000-13-01", "2001-02-29", "tomorrow", "2000-08-08T00:00"] {
            assert_eq!(
                validate("Ann", "+1", text),
                vec![ValidationError::InvalidBirthdayFormat],
                "{text}"
            );
        }
    }

    #[test]
    fn test_all_rules_are_reported_in_order() {
        assert_eq!(
            validate("", "", ""),
            vec![
                ValidationError::NameRequired,
                ValidationError::PhoneRequired,
                ValidationError::BirthdayRequired,
            ]
        );
        assert_eq!(
            validate_messages(" ", "", "nope"),
            vec![
                "Name is required",
                "Phone number is required",
                "Invalid birthday format",
            ]
        );
    }

    #[test]
    fn test_contact_input_validate_trims_and_parses() {
        let valid = ContactInput::new(" Ann ", " +44 ", "2000-08-08")
            .validate()
            .unwrap();

        assert_eq!(valid.name, "Ann");
        assert_eq!(valid.phone, "+44");
        assert_eq!(valid.birthday, NaiveDate::from_ymd_opt(2000, 8, 8).unwrap());
    }

    #[test]
    fn test_contact_input_validate_returns_errors() {
        let errors = ContactInput::default().validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
