//! Input validation shared by the API handlers and the admin tooling.
//!
//! Every function returns [`CoreError::Validation`] with a message that can be
//! shown to the user as-is.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::Date;

/// Minimum number of digits in a student id number.
pub const MIN_STUDENT_ID_DIGITS: usize = 13;

/// Maximum stored length of a student id number (`VARCHAR(50)`).
pub const MAX_STUDENT_ID_LENGTH: usize = 50;

/// Minimum password length for account passwords.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MIN_TITLE_LENGTH: usize = 3;
pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_LOCATION_LENGTH: usize = 500;
pub const MAX_SCHEDULE_LENGTH: usize = 50;
pub const MAX_NAME_LENGTH: usize = 255;

/// Trim `value` and fail if nothing is left.
pub fn require_non_empty(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim and bound a human name.
pub fn validate_name(field: &str, value: &str) -> Result<String, CoreError> {
    let name = require_non_empty(field, value)?;
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name)
}

/// Trim an email address, check its syntax and lower-case it.
pub fn normalize_email(field: &str, value: &str) -> Result<String, CoreError> {
    let email = require_non_empty(field, value)?;
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "{field} is not a valid email address"
        )));
    }
    Ok(email.to_lowercase())
}

/// Optional student id: blank means absent, otherwise digits only and at
/// least [`MIN_STUDENT_ID_DIGITS`] long.
pub fn validate_student_id_number(value: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "Student id number must contain only digits".into(),
        ));
    }
    if raw.len() < MIN_STUDENT_ID_DIGITS {
        return Err(CoreError::Validation(format!(
            "Student id number must have at least {MIN_STUDENT_ID_DIGITS} digits"
        )));
    }
    if raw.len() > MAX_STUDENT_ID_LENGTH {
        return Err(CoreError::Validation(format!(
            "Student id number must have at most {MAX_STUDENT_ID_LENGTH} digits"
        )));
    }
    Ok(Some(raw.to_string()))
}

/// Contact details a student provides when submitting a permission document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContact {
    pub student_email: String,
    pub guardian_name: String,
    pub guardian_email: String,
}

/// Validate and normalize submission contact fields.
///
/// The student and the guardian must have different email addresses.
pub fn validate_submission_contact(
    student_email: &str,
    guardian_name: &str,
    guardian_email: &str,
) -> Result<SubmissionContact, CoreError> {
    let student_email = normalize_email("Student email", student_email)?;
    let guardian_name = validate_name("Guardian name", guardian_name)?;
    let guardian_email = normalize_email("Guardian email", guardian_email)?;

    if student_email == guardian_email {
        return Err(CoreError::Validation(
            "Guardian email must be different from the student email".into(),
        ));
    }

    Ok(SubmissionContact {
        student_email,
        guardian_name,
        guardian_email,
    })
}

/// Validate the password length requirement.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Event fields that are checked together on create and update.
#[derive(Debug, Clone, Copy)]
pub struct EventFields<'a> {
    pub title: &'a str,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub location: Option<&'a str>,
    pub schedule_text: Option<&'a str>,
}

pub fn validate_event_fields(fields: EventFields<'_>) -> Result<(), CoreError> {
    let title_len = fields.title.trim().chars().count();
    if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&title_len) {
        return Err(CoreError::Validation(format!(
            "Title must be between {MIN_TITLE_LENGTH} and {MAX_TITLE_LENGTH} characters"
        )));
    }
    if let Some(end) = fields.end_date {
        if end < fields.start_date {
            return Err(CoreError::Validation(
                "End date must not be before the start date".into(),
            ));
        }
    }
    if fields
        .location
        .is_some_and(|l| l.chars().count() > MAX_LOCATION_LENGTH)
    {
        return Err(CoreError::Validation(format!(
            "Location must be at most {MAX_LOCATION_LENGTH} characters"
        )));
    }
    if fields
        .schedule_text
        .is_some_and(|s| s.chars().count() > MAX_SCHEDULE_LENGTH)
    {
        return Err(CoreError::Validation(format!(
            "Schedule must be at most {MAX_SCHEDULE_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn day(d: u32) -> Date {
        Date::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn blank_student_id_is_absent() {
        assert_eq!(validate_student_id_number(None).unwrap(), None);
        assert_eq!(validate_student_id_number(Some("  ")).unwrap(), None);
    }

    #[test]
    fn student_id_needs_thirteen_digits() {
        assert!(validate_student_id_number(Some("123456789012")).is_err());
        assert_eq!(
            validate_student_id_number(Some(" 1234567890123 ")).unwrap(),
            Some("1234567890123".to_string())
        );
    }

    #[test]
    fn student_id_must_be_numeric() {
        let err = validate_student_id_number(Some("12345678901a3")).unwrap_err();
        assert!(err.to_string().contains("only digits"));
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(
            normalize_email("Email", "  Ana.Silva@Example.COM ").unwrap(),
            "ana.silva@example.com"
        );
        assert_matches!(normalize_email("Email", "not-an-email"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn guardian_email_must_differ_from_student_email() {
        let err = validate_submission_contact("ana@example.com", "Maria", "ANA@example.com ")
            .unwrap_err();
        assert!(err.to_string().contains("different"));
    }

    #[test]
    fn valid_contact_passes() {
        let contact =
            validate_submission_contact("ana@example.com", " Maria Silva ", "maria@example.com")
                .unwrap();
        assert_eq!(contact.guardian_name, "Maria Silva");
        assert_eq!(contact.guardian_email, "maria@example.com");
    }

    #[test]
    fn guardian_name_is_required() {
        let result = validate_submission_contact("ana@example.com", "   ", "maria@example.com");
        assert!(result.is_err());
    }

    #[test]
    fn password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("eight888").is_ok());
    }

    #[test]
    fn event_end_before_start_fails() {
        let fields = EventFields {
            title: "Field trip",
            start_date: day(10),
            end_date: Some(day(9)),
            location: None,
            schedule_text: None,
        };
        assert!(validate_event_fields(fields).is_err());
    }

    #[test]
    fn event_title_bounds() {
        let mut fields = EventFields {
            title: "ab",
            start_date: day(10),
            end_date: None,
            location: Some("Museum"),
            schedule_text: Some("08:00"),
        };
        assert!(validate_event_fields(fields).is_err());
        fields.title = "Museum visit";
        assert!(validate_event_fields(fields).is_ok());
    }
}
