//! Driven port for the append-only verification audit log.

use async_trait::async_trait;

use crate::domain::{
    NewVerificationLogEntry, VerificationLogEntry, VerificationLogFilter, VerificationLogRecord,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by audit log adapters.
    pub enum VerificationLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "verification log connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "verification log query failed: {message}",
    }
}

/// Append-only audit log of verification attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationLogRepository: Send + Sync {
    /// Append one entry and return it with its assigned id.
    async fn append(
        &self,
        entry: &NewVerificationLogEntry,
    ) -> Result<VerificationLogEntry, VerificationLogRepositoryError>;

    /// Entries matching `filter`, newest first, joined with checker usernames.
    async fn query(
        &self,
        filter: &VerificationLogFilter,
    ) -> Result<Vec<VerificationLogRecord>, VerificationLogRepositoryError>;
}
