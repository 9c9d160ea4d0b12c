//! Verified-identity capability consumed by the application layer.
//!
//! The service never inspects credentials itself. An adapter (JWT today,
//! anything tomorrow) validates whatever arrived on the wire and produces a
//! `VerifiedIdentity`; everything downstream scopes its reads and writes by
//! `subject_id` and never sees the raw credential.

use super::OwnerId;

/// An identity that has passed credential verification.
///
/// Missing and invalid credentials are collapsed into a single
/// `Unauthorized` outcome before this type is ever constructed, so holding
/// a `VerifiedIdentity` is proof that verification succeeded.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// The subject (`sub`) claim: the owning identity for all operations.
    pub subject_id: OwnerId,
}

impl VerifiedIdentity {
    /// Creates a verified identity for the given subject.
    pub fn new(subject_id: OwnerId) -> Self {
        Self { subject_id }
    }
}
