//! CSV rendering for verification log exports.

use std::borrow::Cow;

use chrono::NaiveDate;

use crate::domain::VerificationLogView;

/// Header row of an export.
pub const CSV_HEADER: &str = "LogId,LicenseId,Status,CheckedBy,CheckedDate";
const CHECKED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Attachment file name for an export produced on `date`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use license_registry::inbound::http::verification_csv::export_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 9).expect("valid date");
/// assert_eq!(export_file_name(date), "VerificationLogs_20250309.csv");
/// ```
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("VerificationLogs_{}.csv", date.format("%Y%m%d"))
}

/// Render log views as CSV with a header row and CRLF line endings.
#[must_use]
pub fn render_logs(logs: &[VerificationLogView]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 2 + logs.len() * 64);
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");
    for log in logs {
        let checked_date = log.checked_date.format(CHECKED_DATE_FORMAT).to_string();
        let fields = [
            Cow::Owned(log.log_id.to_string()),
            escape(&log.license_id),
            Cow::Borrowed(log.verification_status.as_str()),
            escape(&log.checked_by_username),
            Cow::Owned(checked_date),
        ];
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

const FORMULA_TRIGGERS: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Quote a text field, prefixing `'` when a spreadsheet would read it as a
/// formula.
fn escape(field: &str) -> Cow<'_, str> {
    let field = if field.starts_with(FORMULA_TRIGGERS) {
        Cow::Owned(format!("'{field}"))
    } else {
        Cow::Borrowed(field)
    };
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        field
    }
}
