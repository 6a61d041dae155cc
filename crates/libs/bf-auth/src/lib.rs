//! Authentication primitives for the bookfinder service.
//!
//! - [`jwt`]: issue and verify stateless session tokens
//! - [`secret_hash`]: Argon2 password hashing with a tunable work factor
//! - [`password_policy`]: minimum-strength rules for candidate passwords

pub mod error;
pub mod jwt;
pub mod password_policy;
pub mod prelude;
pub mod secret_hash;

pub const CONNECTION_TOKEN_TYPE: &str = "Bearer";
pub const ISS: &str = "bookfinder";
