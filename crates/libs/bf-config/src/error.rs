//! Configuration error types.

/// Configuration errors.
///
/// All of them are fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// TOML deserialization failed.
    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),

    /// No signing secret in the file or the environment.
    #[error("Missing signing secret: set `auth.secret_key` or {0}")]
    MissingSecret(&'static str),

    /// A setting holds a value that cannot be used.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}
