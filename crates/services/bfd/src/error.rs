//! Error types for the bookfinder service.
//!
//! Everything here happens before or around serving: a failure aborts
//! startup and `main` exits non-zero.

/// Errors that can stop the bookfinder service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] bf_config::error::Error),

    #[error(transparent)]
    Auth(#[from] bf_auth::error::Error),

    #[error(transparent)]
    Model(#[from] bf_models::error::Error),

    #[error(transparent)]
    Web(#[from] bf_web::error::Error),
}
