//! Driving port for licence verification use-cases.

use async_trait::async_trait;

use crate::domain::{Checker, Error, VerificationRequest, VerificationResult};

/// Verification use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LicenseVerification: Send + Sync {
    /// Verify a licence and record the attempt in the audit log.
    ///
    /// An unknown licence id is a `Fake` result, not an error. Errors are
    /// reserved for invalid input and store failures.
    async fn verify(
        &self,
        request: VerificationRequest,
        checker: Checker,
    ) -> Result<VerificationResult, Error>;

    /// Public status check performed as an anonymous checker.
    ///
    /// The attempt is logged; a `Fake` outcome is then reported as not found.
    async fn check_status(&self, license_id: &str) -> Result<VerificationResult, Error>;
}
