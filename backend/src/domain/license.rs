//! Licence identifiers and status resolution.
//!
//! A licence status is a projection of the expiry date. The stored status
//! column exists for display only; [`effective_status`] is the single rule
//! every read path uses.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum licence identifier length accepted at registration.
pub const LICENSE_ID_MAX: usize = 50;

/// Validation errors raised by [`LicenseId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseIdValidationError {
    Empty,
    TooLong { max: usize },
}

impl fmt::Display for LicenseIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "license id must not be empty"),
            Self::TooLong { max } => write!(f, "license id must be at most {max} characters"),
        }
    }
}

impl std::error::Error for LicenseIdValidationError {}

/// Registry key of a driver licence.
///
/// ## Invariants
/// - Trimmed, non-empty and at most [`LICENSE_ID_MAX`] characters.
/// - Case is preserved; lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseId(String);

impl LicenseId {
    /// Validate and construct a licence identifier.
    ///
    /// # Examples
    /// ```
    /// use license_registry::domain::LicenseId;
    ///
    /// let id = LicenseId::new(" DL-100 ").expect("valid id");
    /// assert_eq!(id.as_ref(), "DL-100");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LicenseIdValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LicenseIdValidationError::Empty);
        }
        if trimmed.chars().count() > LICENSE_ID_MAX {
            return Err(LicenseIdValidationError::TooLong {
                max: LICENSE_ID_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LicenseId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LicenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LicenseId> for String {
    fn from(value: LicenseId) -> Self {
        value.0
    }
}

impl TryFrom<String> for LicenseId {
    type Error = LicenseIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Current standing of a registered licence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Expired,
}

impl LicenseStatus {
    /// Storage and wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }

    /// Parse a stored status value, returning `None` for anything that is not
    /// one of the two canonical values.
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a licence status from its expiry date.
///
/// The licence stays active through the whole expiry day, measured in UTC.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use license_registry::domain::{resolve_status, LicenseStatus};
///
/// let now = Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 0).single().expect("valid time");
/// let today = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
/// assert_eq!(resolve_status(today, now), LicenseStatus::Active);
/// ```
#[must_use]
pub fn resolve_status(expiry: NaiveDate, now: DateTime<Utc>) -> LicenseStatus {
    if expiry >= now.date_naive() {
        LicenseStatus::Active
    } else {
        LicenseStatus::Expired
    }
}

/// Status used by verification and statistics for a stored record.
///
/// A stored value outside the canonical pair (for example a legacy
/// `suspended`) folds into [`LicenseStatus::Expired`]; otherwise the expiry
/// date decides.
#[must_use]
pub fn effective_status(stored: &str, expiry: NaiveDate, now: DateTime<Utc>) -> LicenseStatus {
    match LicenseStatus::from_stored(stored) {
        Some(_) => resolve_status(expiry, now),
        None => LicenseStatus::Expired,
    }
}
