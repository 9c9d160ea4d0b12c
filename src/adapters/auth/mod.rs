//! Authentication adapters.

mod jwt;

pub use jwt::{Claims, JwtIdentityVerifier};
