//! IdentityVerifier port - credential verification boundary.

use crate::domain::foundation::{DomainError, VerifiedIdentity};

/// Port for turning an opaque bearer credential into a verified identity.
///
/// Missing, malformed, expired, and wrongly-signed credentials all map to
/// the same `Unauthorized` error; the core does not distinguish them.
pub trait IdentityVerifier: Send + Sync {
    /// Verifies a bearer token and extracts the subject.
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, DomainError>;
}
