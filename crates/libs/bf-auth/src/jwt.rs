//! Stateless session tokens.
//!
//! A [`TokenService`] signs an [`IdentityClaim`] with a server-held secret
//! (HS256) and verifies presented tokens. Nothing is stored server side: a
//! token stays valid until it expires or the secret is rotated.
//!
//! # Examples
//!
//! ```rust
//! use bf_auth::jwt::TokenService;
//! use chrono::TimeDelta;
//!
//! let tokens = TokenService::new(b"MySuperSecret", Some(TimeDelta::hours(12))).unwrap();
//! let token = tokens.issue("alice").unwrap();
//!
//! let claim = tokens.verify(&token).unwrap();
//! assert_eq!(claim.sub, "alice");
//! ```

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ISS;
use crate::prelude::*;

/// JWT signing algorithm used for every session token.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Identity data carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    /// Subject (account username).
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Issued at time.
    pub iat: i64,
    /// Expiration time, absent when tokens are issued without a lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// JWT ID.
    pub jti: Uuid,
}

impl IdentityClaim {
    fn new(subject: &str, now: DateTime<Utc>, lifetime: Option<TimeDelta>) -> Result<Self> {
        let exp = lifetime
            .map(|lifetime| {
                now.checked_add_signed(lifetime)
                    .map(|expiration| expiration.timestamp())
                    .ok_or(Error::TokenCreation)
            })
            .transpose()?;

        Ok(Self {
            sub: String::from(subject),
            iss: String::from(ISS),
            iat: now.timestamp(),
            exp,
            jti: Uuid::new_v4(),
        })
    }
}

/// Issues and verifies signed session tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Option<TimeDelta>,
}

impl TokenService {
    /// Creates a token service signing with `secret`.
    ///
    /// With `lifetime` set, issued tokens carry an `exp` claim and verification
    /// requires it. Without one, tokens are valid until the secret changes.
    ///
    /// Fails with [`Error::MissingSecret`] when `secret` is empty.
    pub fn new(secret: &[u8], lifetime: Option<TimeDelta>) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::MissingSecret);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(&[ISS]);
        if lifetime.is_some() {
            validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        } else {
            validation.set_required_spec_claims(&["sub", "iss"]);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        })
    }

    /// Lifetime given to newly issued tokens.
    pub fn lifetime(&self) -> Option<TimeDelta> {
        self.lifetime
    }

    /// Issues a token for `subject`, stamped with the current time.
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_at(subject, Utc::now())
    }

    /// Issues a token for `subject` as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String> {
        let claim = IdentityClaim::new(subject, now, self.lifetime)?;
        Ok(encode(&Header::new(ALGORITHM), &claim, &self.encoding)?)
    }

    /// Verifies a token and returns the claim it carries.
    ///
    /// # Errors
    ///
    /// * [`Error::BadSignature`] - signed with another secret, or tampered with
    /// * [`Error::TokenExpired`] - the `exp` claim has elapsed
    /// * [`Error::MalformedCredential`] - anything else that keeps the token from decoding
    pub fn verify(&self, token: &str) -> Result<IdentityClaim> {
        decode::<IdentityClaim>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => Error::BadSignature,
                ErrorKind::ExpiredSignature => Error::TokenExpired,
                _ => Error::MalformedCredential,
            })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}
