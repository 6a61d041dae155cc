//! Storage error types.

/// Storage operation errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No account with the requested username.
    #[error("Account not found")]
    NotFound,

    /// An account with the same username already exists.
    #[error("Account already exists")]
    Conflict,

    /// A partial update carried no field to change.
    #[error("No data")]
    EmptyUpdate,

    /// A writer panicked while holding the in-memory store.
    #[error("Credential store lock poisoned")]
    Poisoned,

    /// Embedded migrations failed to apply.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Database connection pool error.
    #[error(transparent)]
    R2D2(#[from] diesel::r2d2::PoolError),

    /// Diesel ORM operation error.
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),
}
