//! Tests for the in-memory registry store.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    Checker, LicenseId, LicenseStatus, UserAccountStatus, VerificationOutcome,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0)
        .single()
        .expect("timestamp")
}

#[fixture]
fn registry() -> InMemoryRegistry {
    InMemoryRegistry::new()
}

async fn officer(registry: &InMemoryRegistry) -> User {
    UserRepository::insert(
        registry,
        &NewUser {
            username: Username::new("officer").expect("username"),
            password_hash: "hash".to_owned(),
            status: UserAccountStatus::Active,
        },
    )
    .await
    .expect("user inserted")
}

fn new_driver(license_id: &str, registered_by: UserId, created_at: DateTime<Utc>) -> NewDriver {
    NewDriver {
        license_id: LicenseId::new(license_id).expect("licence id"),
        full_name: "Abebe Kebede".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).expect("date"),
        license_type: "B".to_owned(),
        expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).expect("date"),
        qr_raw_data: None,
        ocr_raw_text: None,
        registered_by,
        status: LicenseStatus::Active,
        created_at,
    }
}

fn log(license_id: &str, checker: Checker, checked_at: DateTime<Utc>) -> NewVerificationLogEntry {
    NewVerificationLogEntry {
        license_id: license_id.to_owned(),
        outcome: VerificationOutcome::Fake,
        checker,
        checked_at,
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_licence_ids_are_rejected(registry: InMemoryRegistry) {
    let user = officer(&registry).await;
    DriverRepository::insert(&registry, &new_driver("DL-1", user.id(), at(1, 8)))
        .await
        .expect("first insert");
    let error = DriverRepository::insert(&registry, &new_driver("DL-1", user.id(), at(1, 9)))
        .await
        .expect_err("duplicate");
    assert_eq!(error, DriverRepositoryError::duplicate("DL-1"));
}

#[rstest]
#[tokio::test]
async fn licence_lookup_is_case_sensitive(registry: InMemoryRegistry) {
    let user = officer(&registry).await;
    DriverRepository::insert(&registry, &new_driver("DL-1", user.id(), at(1, 8)))
        .await
        .expect("insert");
    let found = registry.find_by_license_id("dl-1").await.expect("lookup");
    assert!(found.is_none());
    let found = registry
        .find_by_license_id("DL-1")
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(found.registrant.as_ref().map(AsRef::as_ref), Some("officer"));
}

#[rstest]
#[tokio::test]
async fn drivers_are_listed_newest_first(registry: InMemoryRegistry) {
    let user = officer(&registry).await;
    for (id, day) in [("DL-1", 1), ("DL-3", 3), ("DL-2", 2)] {
        DriverRepository::insert(&registry, &new_driver(id, user.id(), at(day, 8)))
            .await
            .expect("insert");
    }
    let listed = registry.list_all().await.expect("list");
    let ids: Vec<_> = listed.iter().map(|d| d.record.license_id.as_ref()).collect();
    assert_eq!(ids, ["DL-3", "DL-2", "DL-1"]);
}

#[rstest]
#[tokio::test]
async fn log_query_filters_and_joins_usernames(registry: InMemoryRegistry) {
    let user = officer(&registry).await;
    let checker = Checker::User(user.id());
    registry.append(&log("DL-1", checker, at(1, 8))).await.expect("append");
    registry
        .append(&log("DL-1", Checker::Anonymous, at(2, 8)))
        .await
        .expect("append");
    registry.append(&log("DL-2", checker, at(5, 8))).await.expect("append");

    let all = registry
        .query(&VerificationLogFilter::default())
        .await
        .expect("query");
    let ids: Vec<_> = all.iter().map(|r| r.entry.id).collect();
    assert_eq!(ids, [3, 2, 1]);
    assert!(all[1].checker_username.is_none());
    assert_eq!(
        all[0].checker_username.as_ref().map(AsRef::as_ref),
        Some("officer")
    );

    let window = VerificationLogFilter {
        start: NaiveDate::from_ymd_opt(2025, 1, 1),
        end: NaiveDate::from_ymd_opt(2025, 1, 2),
        ..VerificationLogFilter::default()
    };
    assert_eq!(registry.query(&window).await.expect("query").len(), 2);

    let by_checker = VerificationLogFilter {
        checker: Some(checker),
        license_id: Some("DL-2".to_owned()),
        ..VerificationLogFilter::default()
    };
    let filtered = registry.query(&by_checker).await.expect("query");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].entry.license_id, "DL-2");
}

#[rstest]
#[tokio::test]
async fn usernames_are_unique(registry: InMemoryRegistry) {
    officer(&registry).await;
    let error = UserRepository::insert(
        &registry,
        &NewUser {
            username: Username::new("officer").expect("username"),
            password_hash: "other".to_owned(),
            status: UserAccountStatus::Active,
        },
    )
    .await
    .expect_err("duplicate username");
    assert_eq!(error, UserPersistenceError::duplicate("officer"));
}
