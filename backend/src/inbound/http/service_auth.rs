//! Service credential for the sync endpoints.
//!
//! The configured token is held only as a SHA-256 digest. Presented tokens
//! are hashed and the digests compared without early exit, and only an
//! 8-byte hex fingerprint of the digest is ever logged.

use std::fmt;

use actix_web::HttpRequest;
use actix_web::http::header;
use sha2::{Digest, Sha256};

const BEARER_PREFIX: &str = "Bearer ";

/// Shared secret required by the sync endpoints when configured.
#[derive(Clone)]
pub struct ServiceToken {
    digest: [u8; 32],
}

impl ServiceToken {
    /// Build a token from configuration. Blank input yields `None`.
    ///
    /// # Examples
    /// ```
    /// use firewood_dispatch::inbound::http::service_auth::ServiceToken;
    ///
    /// assert!(ServiceToken::from_secret("  ").is_none());
    /// let token = ServiceToken::from_secret("s3cret").expect("non-blank");
    /// assert!(token.verify("s3cret"));
    /// assert!(!token.verify("guess"));
    /// ```
    pub fn from_secret(secret: &str) -> Option<Self> {
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            digest: digest(trimmed),
        })
    }

    /// Check a presented token.
    pub fn verify(&self, presented: &str) -> bool {
        let candidate = digest(presented.trim());
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Hex of the first eight digest bytes, safe for logs.
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.digest[..8])
    }
}

impl fmt::Debug for ServiceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceToken")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// Extract the bearer token from the `Authorization` header.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Whether `req` satisfies `required`. An unset token admits everyone.
pub fn is_authorised(required: Option<&ServiceToken>, req: &HttpRequest) -> bool {
    match required {
        None => true,
        Some(token) => bearer_token(req).is_some_and(|presented| token.verify(presented)),
    }
}
