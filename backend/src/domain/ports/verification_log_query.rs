//! Driving port for reading the verification audit log.

use async_trait::async_trait;

use crate::domain::{Error, VerificationLogExport, VerificationLogFilter, VerificationLogView};

/// Audit log queries consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationLogQuery: Send + Sync {
    /// Entries matching `filter`, newest first.
    async fn list_logs(
        &self,
        filter: VerificationLogFilter,
    ) -> Result<Vec<VerificationLogView>, Error>;

    /// Entries matching `filter`, stamped with the current UTC day.
    async fn export_logs(
        &self,
        filter: VerificationLogFilter,
    ) -> Result<VerificationLogExport, Error>;
}
