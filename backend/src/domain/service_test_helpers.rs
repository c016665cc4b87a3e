//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{DriverRecord, LicenseId, RegisteredDriver, UserId, Username};

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// 2025-01-01T10:00:00Z
pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

pub(crate) fn officer_id() -> UserId {
    UserId::new(7).expect("valid user id")
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(crate) fn registered_driver(license_id: &str, expiry: NaiveDate, stored_status: &str) -> RegisteredDriver {
    RegisteredDriver {
        record: DriverRecord {
            id: 11,
            license_id: LicenseId::new(license_id).expect("valid license id"),
            full_name: "Abebe Kebede".to_owned(),
            date_of_birth: date(1990, 5, 17),
            license_type: "B".to_owned(),
            expiry_date: expiry,
            qr_raw_data: Some(format!("{license_id}|B")),
            ocr_raw_text: None,
            created_at: fixture_now(),
            registered_by: officer_id(),
            stored_status: stored_status.to_owned(),
        },
        registrant: Some(Username::new("officer").expect("valid username")),
    }
}
