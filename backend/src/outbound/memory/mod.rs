//! In-memory registry store.
//!
//! [`InMemoryRegistry`] implements every driven store port over a single
//! mutex-guarded state so joins between users, drivers and audit entries stay
//! consistent. The server uses it when no database URL is configured and the
//! integration tests use it to drive the full HTTP stack.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    DriverRepository, DriverRepositoryError, UserPersistenceError, UserRepository,
    VerificationLogRepository, VerificationLogRepositoryError,
};
use crate::domain::{
    Checker, DriverRecord, NewDriver, NewUser, NewVerificationLogEntry, RegisteredDriver, User,
    UserCredentialsRecord, UserId, Username, VerificationLogEntry, VerificationLogFilter,
    VerificationLogRecord,
};

#[derive(Default)]
struct RegistryState {
    users: Vec<UserCredentialsRecord>,
    drivers: Vec<DriverRecord>,
    logs: Vec<VerificationLogEntry>,
}

impl RegistryState {
    fn username_of(&self, id: UserId) -> Option<Username> {
        self.users
            .iter()
            .find(|record| record.user.id() == id)
            .map(|record| record.user.username().clone())
    }

    fn registered(&self, record: &DriverRecord) -> RegisteredDriver {
        RegisteredDriver {
            record: record.clone(),
            registrant: self.username_of(record.registered_by),
        }
    }
}

/// Mutex-guarded registry implementing the driver, audit log and user
/// stores.
#[derive(Default)]
pub struct InMemoryRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, RegistryState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory registry lock poisoned".to_owned())
    }
}

fn next_id<T>(items: &[T]) -> Result<i32, String> {
    i32::try_from(items.len())
        .ok()
        .and_then(|len| len.checked_add(1))
        .ok_or_else(|| "in-memory registry is full".to_owned())
}

#[async_trait]
impl DriverRepository for InMemoryRegistry {
    async fn find_by_license_id(
        &self,
        license_id: &str,
    ) -> Result<Option<RegisteredDriver>, DriverRepositoryError> {
        let state = self.lock().map_err(DriverRepositoryError::query)?;
        Ok(state
            .drivers
            .iter()
            .find(|record| record.license_id.as_ref() == license_id)
            .map(|record| state.registered(record)))
    }

    async fn insert(&self, driver: &NewDriver) -> Result<DriverRecord, DriverRepositoryError> {
        let mut state = self.lock().map_err(DriverRepositoryError::query)?;
        if state
            .drivers
            .iter()
            .any(|record| record.license_id == driver.license_id)
        {
            return Err(DriverRepositoryError::duplicate(driver.license_id.as_ref()));
        }
        let record = DriverRecord {
            id: next_id(&state.drivers).map_err(DriverRepositoryError::query)?,
            license_id: driver.license_id.clone(),
            full_name: driver.full_name.clone(),
            date_of_birth: driver.date_of_birth,
            license_type: driver.license_type.clone(),
            expiry_date: driver.expiry_date,
            qr_raw_data: driver.qr_raw_data.clone(),
            ocr_raw_text: driver.ocr_raw_text.clone(),
            created_at: driver.created_at,
            registered_by: driver.registered_by,
            stored_status: driver.status.as_str().to_owned(),
        };
        state.drivers.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<RegisteredDriver>, DriverRepositoryError> {
        let state = self.lock().map_err(DriverRepositoryError::query)?;
        let mut drivers: Vec<_> = state
            .drivers
            .iter()
            .map(|record| state.registered(record))
            .collect();
        drivers.sort_by(|a, b| {
            (b.record.created_at, b.record.id).cmp(&(a.record.created_at, a.record.id))
        });
        Ok(drivers)
    }
}

#[async_trait]
impl VerificationLogRepository for InMemoryRegistry {
    async fn append(
        &self,
        entry: &NewVerificationLogEntry,
    ) -> Result<VerificationLogEntry, VerificationLogRepositoryError> {
        let mut state = self.lock().map_err(VerificationLogRepositoryError::query)?;
        let id = next_id(&state.logs).map_err(VerificationLogRepositoryError::query)?;
        let stored = VerificationLogEntry {
            id: i64::from(id),
            license_id: entry.license_id.clone(),
            outcome: entry.outcome,
            checker: entry.checker,
            checked_at: entry.checked_at,
        };
        state.logs.push(stored.clone());
        Ok(stored)
    }

    async fn query(
        &self,
        filter: &VerificationLogFilter,
    ) -> Result<Vec<VerificationLogRecord>, VerificationLogRepositoryError> {
        let state = self.lock().map_err(VerificationLogRepositoryError::query)?;
        let mut records: Vec<_> = state
            .logs
            .iter()
            .filter(|entry| filter.matches(entry))
            .map(|entry| VerificationLogRecord {
                entry: entry.clone(),
                checker_username: match entry.checker {
                    Checker::User(id) => state.username_of(id),
                    Checker::Anonymous => None,
                },
            })
            .collect();
        records.sort_by(|a, b| {
            (b.entry.checked_at, b.entry.id).cmp(&(a.entry.checked_at, a.entry.id))
        });
        Ok(records)
    }
}

#[async_trait]
impl UserRepository for InMemoryRegistry {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .iter()
            .find(|record| record.user.id() == id)
            .map(|record| record.user.clone()))
    }

    async fn find_credentials_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .iter()
            .find(|record| record.user.username() == username)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state
            .users
            .iter()
            .any(|record| record.user.username() == &user.username)
        {
            return Err(UserPersistenceError::duplicate(user.username.as_ref()));
        }
        let raw_id = next_id(&state.users).map_err(UserPersistenceError::query)?;
        let id = UserId::new(raw_id).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let created = User::new(id, user.username.clone(), user.status, Utc::now());
        state.users.push(UserCredentialsRecord {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }
}

#[cfg(test)]
mod tests;
