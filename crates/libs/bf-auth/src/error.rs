use crate::password_policy::WeakPassword;

#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
    #[error("Malformed Credential")]
    MalformedCredential,
    #[error("Bad Signature")]
    BadSignature,
    #[error("Token Expired")]
    TokenExpired,

    #[error("Signing secret is missing")]
    MissingSecret,
    #[error("Token lifetime overflows the clock")]
    TokenCreation,
    #[error(transparent)]
    TokenEncoding(#[from] jsonwebtoken::errors::Error),

    #[error("Error hashing password {0}")]
    PasswordHash(argon2::password_hash::Error),
    #[error("Invalid hasher parameters {0}")]
    HasherParams(argon2::Error),

    #[error(transparent)]
    WeakPassword(#[from] WeakPassword),
}
