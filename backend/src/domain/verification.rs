//! Verification outcomes, results and audit log entries.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LicenseStatus, UserId, Username};

/// Display name for checks made without a signed-in user.
pub const ANONYMOUS_USERNAME: &str = "anonymous";

/// Three-way answer to "is this licence genuine and valid?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationOutcome {
    Fake,
    Active,
    Expired,
}

impl VerificationOutcome {
    /// The licence exists in the registry.
    #[must_use]
    pub fn is_real(self) -> bool {
        !matches!(self, Self::Fake)
    }

    /// The licence exists and has not expired.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Human readable explanation shown to the checker.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Fake => "This license is fake and not found in our central registry",
            Self::Expired => "This license is real but has expired",
            Self::Active => "This license is real and active",
        }
    }

    /// Storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fake => "fake",
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }

    /// Parse a stored outcome; unknown values are rejected.
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fake" => Some(Self::Fake),
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl From<LicenseStatus> for VerificationOutcome {
    fn from(value: LicenseStatus) -> Self {
        match value {
            LicenseStatus::Active => Self::Active,
            LicenseStatus::Expired => Self::Expired,
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who performed a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checker {
    /// Public status check without a session.
    Anonymous,
    /// Signed-in staff user.
    User(UserId),
}

impl Checker {
    /// Storage representation; `0` marks anonymous checks.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Anonymous => 0,
            Self::User(id) => id.get(),
        }
    }

    /// Rebuild from storage. Non-positive values are anonymous.
    #[must_use]
    pub fn from_i32(raw: i32) -> Self {
        UserId::new(raw).map_or(Self::Anonymous, Self::User)
    }
}

/// Verification request as accepted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Licence identifier exactly as scanned or typed.
    pub license_id: String,
    /// Decoded QR payload, when the caller scanned one.
    pub scanned_qr_data: Option<String>,
}

/// Answer returned to the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub license_id: String,
    pub status: VerificationOutcome,
    pub is_real: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    pub checked_at: DateTime<Utc>,
    pub message: String,
}

impl VerificationResult {
    /// Result for a licence id with no registry record.
    #[must_use]
    pub fn fake(license_id: impl Into<String>, checked_at: DateTime<Utc>) -> Self {
        Self::build(license_id.into(), VerificationOutcome::Fake, None, checked_at)
    }

    /// Result for a registered licence.
    #[must_use]
    pub fn registered(
        license_id: impl Into<String>,
        status: LicenseStatus,
        driver_name: impl Into<String>,
        expiry_date: NaiveDate,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self::build(
            license_id.into(),
            status.into(),
            Some((driver_name.into(), expiry_date)),
            checked_at,
        )
    }

    fn build(
        license_id: String,
        status: VerificationOutcome,
        driver: Option<(String, NaiveDate)>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let (driver_name, expiry_date) = driver.unzip();
        Self {
            license_id,
            status,
            is_real: status.is_real(),
            is_active: status.is_active(),
            driver_name,
            expiry_date,
            checked_at,
            message: status.message().to_owned(),
        }
    }
}

/// Audit entry to append for one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVerificationLogEntry {
    pub license_id: String,
    pub outcome: VerificationOutcome,
    pub checker: Checker,
    pub checked_at: DateTime<Utc>,
}

/// Stored audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationLogEntry {
    pub id: i64,
    pub license_id: String,
    pub outcome: VerificationOutcome,
    pub checker: Checker,
    pub checked_at: DateTime<Utc>,
}

/// Audit entry joined with the checker's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationLogRecord {
    pub entry: VerificationLogEntry,
    pub checker_username: Option<Username>,
}

/// Audit entry as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationLogView {
    pub log_id: i64,
    pub license_id: String,
    pub verification_status: VerificationOutcome,
    pub checked_by: i32,
    pub checked_by_username: String,
    pub checked_date: DateTime<Utc>,
}

impl From<VerificationLogRecord> for VerificationLogView {
    fn from(value: VerificationLogRecord) -> Self {
        let VerificationLogRecord {
            entry,
            checker_username,
        } = value;
        let checked_by_username = match (entry.checker, checker_username) {
            (Checker::Anonymous, _) => ANONYMOUS_USERNAME.to_owned(),
            (Checker::User(_), Some(name)) => name.into(),
            (Checker::User(_), None) => crate::domain::UNKNOWN_USERNAME.to_owned(),
        };
        Self {
            log_id: entry.id,
            license_id: entry.license_id,
            verification_status: entry.outcome,
            checked_by: entry.checker.as_i32(),
            checked_by_username,
            checked_date: entry.checked_at,
        }
    }
}

/// Audit log snapshot prepared for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationLogExport {
    /// UTC calendar day the export was produced on.
    pub generated_on: NaiveDate,
    pub logs: Vec<VerificationLogView>,
}

/// Optional filters for audit log queries.
///
/// The date range only applies when both bounds are present; `end` includes
/// the whole day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationLogFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub checker: Option<Checker>,
    pub license_id: Option<String>,
}

impl VerificationLogFilter {
    /// Half-open timestamp window `[start 00:00, end+1 00:00)` when both
    /// bounds are set.
    #[must_use]
    pub fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = (self.start?, self.end?);
        let from = start.and_hms_opt(0, 0, 0)?.and_utc();
        let until = end.succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc();
        Some((from, until))
    }

    /// Whether an entry passes every configured filter.
    #[must_use]
    pub fn matches(&self, entry: &VerificationLogEntry) -> bool {
        let in_window = self
            .window()
            .is_none_or(|(from, until)| entry.checked_at >= from && entry.checked_at < until);
        let by_checker = self.checker.is_none_or(|checker| entry.checker == checker);
        let by_license = self
            .license_id
            .as_deref()
            .is_none_or(|id| entry.license_id == id);
        in_window && by_checker && by_license
    }
}

/// Compare a scanned QR payload with the one captured at registration.
///
/// Comparison trims surrounding whitespace and ignores case. Missing or blank
/// payloads never match. Outcomes do not depend on this check yet.
///
/// # Examples
/// ```
/// use license_registry::domain::qr_payload_matches;
///
/// assert!(qr_payload_matches(Some(" dl-100|b "), Some("DL-100|B")));
/// assert!(!qr_payload_matches(None, Some("DL-100|B")));
/// ```
#[must_use]
pub fn qr_payload_matches(scanned: Option<&str>, stored: Option<&str>) -> bool {
    match (scanned.map(str::trim), stored.map(str::trim)) {
        (Some(scanned), Some(stored)) if !scanned.is_empty() && !stored.is_empty() => {
            scanned.to_lowercase() == stored.to_lowercase()
        }
        _ => false,
    }
}
