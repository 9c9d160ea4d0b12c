//! HS256 JWT verification.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{DomainError, ErrorCode, OwnerId, VerifiedIdentity};
use crate::ports::IdentityVerifier;

/// Claims this service reads. Everything else in the token is ignored.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Shared-secret verifier for HS256-signed bearer tokens.
///
/// Every failure mode collapses to `Unauthorized`: callers get no signal
/// about whether a token was malformed, expired, or forged.
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, DomainError> {
        let unauthorized = || DomainError::new(ErrorCode::Unauthorized, "Invalid or expired token");

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| unauthorized())?;
        let subject_id = OwnerId::new(data.claims.sub).map_err(|_| unauthorized())?;

        Ok(VerifiedIdentity { subject_id })
    }
}
