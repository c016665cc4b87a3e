//! Validation of driver registration requests.
//!
//! [`validate_registration`] is pure: it takes the raw request values, the
//! registrant and a single `now` reading, and either produces a [`NewDriver`]
//! or the first failing rule. Duplicate detection happens in
//! [`crate::domain::DriverService`].

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{
    Error, LicenseId, LicenseIdValidationError, NewDriver, UserId, resolve_status,
};

/// Maximum stored length of a driver's full name.
pub const FULL_NAME_MAX: usize = 100;
/// Maximum stored length of a licence type code.
pub const LICENSE_TYPE_MAX: usize = 10;
/// Accepted calendar date shape.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw registration inputs as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub license_id: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub license_type: String,
    pub expiry_date: String,
    pub qr_raw_data: Option<String>,
    pub ocr_raw_text: Option<String>,
}

/// Field named by a registration validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationField {
    LicenseId,
    FullName,
    DateOfBirth,
    LicenseType,
    ExpiryDate,
}

impl RegistrationField {
    /// Wire name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LicenseId => "licenseId",
            Self::FullName => "fullName",
            Self::DateOfBirth => "dateOfBirth",
            Self::LicenseType => "licenseType",
            Self::ExpiryDate => "expiryDate",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::LicenseId => "license ID",
            Self::FullName => "full name",
            Self::DateOfBirth => "date of birth",
            Self::LicenseType => "license type",
            Self::ExpiryDate => "expiry date",
        }
    }
}

/// First failing registration rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    Missing { field: RegistrationField },
    TooLong { field: RegistrationField, max: usize },
    InvalidDate { field: RegistrationField, value: String },
    DateOfBirthInFuture,
    ExpiryPassed,
}

impl RegistrationValidationError {
    /// Field the caller has to correct.
    #[must_use]
    pub fn field(&self) -> RegistrationField {
        match self {
            Self::Missing { field } | Self::TooLong { field, .. } | Self::InvalidDate { field, .. } => {
                *field
            }
            Self::DateOfBirthInFuture => RegistrationField::DateOfBirth,
            Self::ExpiryPassed => RegistrationField::ExpiryDate,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "missing_field",
            Self::TooLong { .. } => "too_long",
            Self::InvalidDate { .. } => "invalid_date",
            Self::DateOfBirthInFuture => "date_of_birth_in_future",
            Self::ExpiryPassed => "expiry_passed",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", capitalise(field.label())),
            Self::TooLong { field, max } => {
                write!(f, "{} must be at most {max} characters", capitalise(field.label()))
            }
            Self::InvalidDate { field, value } => write!(
                f,
                "Invalid {} format: '{value}'. Expected format: YYYY-MM-DD",
                field.label()
            ),
            Self::DateOfBirthInFuture => write!(f, "Date of birth cannot be in the future"),
            Self::ExpiryPassed => write!(f, "Expiry date has already passed"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<RegistrationValidationError> for Error {
    fn from(value: RegistrationValidationError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field().as_str(),
            "code": value.code(),
        }))
    }
}

fn capitalise(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn require(value: &str, field: RegistrationField) -> Result<(), RegistrationValidationError> {
    if value.trim().is_empty() {
        Err(RegistrationValidationError::Missing { field })
    } else {
        Ok(())
    }
}

fn bounded(
    value: &str,
    field: RegistrationField,
    max: usize,
) -> Result<String, RegistrationValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max {
        return Err(RegistrationValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

fn parse_date(value: &str, field: RegistrationField) -> Result<NaiveDate, RegistrationValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        RegistrationValidationError::InvalidDate {
            field,
            value: value.to_owned(),
        }
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Validate a registration request.
///
/// Rules run in order and the first failure wins: required fields and
/// lengths, date formats, date of birth not in the future, expiry no more
/// than one day in the past.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use license_registry::domain::{validate_registration, RegistrationDraft, UserId};
///
/// let now = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).single().expect("valid time");
/// let draft = RegistrationDraft {
///     license_id: "DL-100".into(),
///     full_name: "Abebe Kebede".into(),
///     date_of_birth: "1990-05-17".into(),
///     license_type: "B".into(),
///     expiry_date: "2030-01-01".into(),
///     ..RegistrationDraft::default()
/// };
/// let driver = validate_registration(draft, UserId::new(1).expect("id"), now).expect("valid");
/// assert_eq!(driver.license_id.as_ref(), "DL-100");
/// ```
pub fn validate_registration(
    draft: RegistrationDraft,
    registrant: UserId,
    now: DateTime<Utc>,
) -> Result<NewDriver, RegistrationValidationError> {
    let RegistrationDraft {
        license_id,
        full_name,
        date_of_birth,
        license_type,
        expiry_date,
        qr_raw_data,
        ocr_raw_text,
    } = draft;

    require(&license_id, RegistrationField::LicenseId)?;
    require(&full_name, RegistrationField::FullName)?;
    require(&expiry_date, RegistrationField::ExpiryDate)?;

    let license_id = LicenseId::new(&license_id).map_err(|err| match err {
        LicenseIdValidationError::Empty => RegistrationValidationError::Missing {
            field: RegistrationField::LicenseId,
        },
        LicenseIdValidationError::TooLong { max } => RegistrationValidationError::TooLong {
            field: RegistrationField::LicenseId,
            max,
        },
    })?;
    let full_name = bounded(&full_name, RegistrationField::FullName, FULL_NAME_MAX)?;
    let license_type = bounded(&license_type, RegistrationField::LicenseType, LICENSE_TYPE_MAX)?;

    let date_of_birth = parse_date(&date_of_birth, RegistrationField::DateOfBirth)?;
    let expiry_date = parse_date(&expiry_date, RegistrationField::ExpiryDate)?;

    let today = now.date_naive();
    if date_of_birth > today {
        return Err(RegistrationValidationError::DateOfBirthInFuture);
    }
    let earliest_expiry = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    if expiry_date < earliest_expiry {
        return Err(RegistrationValidationError::ExpiryPassed);
    }

    Ok(NewDriver {
        license_id,
        full_name,
        date_of_birth,
        license_type,
        expiry_date,
        qr_raw_data: non_blank(qr_raw_data),
        ocr_raw_text: non_blank(ocr_raw_text),
        registered_by: registrant,
        status: resolve_status(expiry_date, now),
        created_at: now,
    })
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;
