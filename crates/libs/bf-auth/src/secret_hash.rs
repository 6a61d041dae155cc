//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC strings: algorithm, parameters and salt travel with the
//! hash, so a hash produced under any work factor verifies under any other.
//!
//! # Examples
//!
//! ```rust
//! use bf_auth::secret_hash::{HashCost, SecretHasher};
//!
//! let hasher = SecretHasher::new(HashCost::MINIMAL).unwrap();
//! let hash = hasher.hash("Str0ng!Pass").unwrap();
//!
//! assert!(hasher.verify("Str0ng!Pass", &hash).unwrap());
//! assert!(!hasher.verify("wrong_password", &hash).unwrap());
//! ```

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, PasswordHash, SaltString},
};
use rand::rngs::OsRng;

use crate::prelude::*;

const PLACEHOLDER_SECRET: &str = "bookfinder-missing-account";

/// Cost parameters for password hashing.
///
/// `work_factor` is the Argon2 time cost (passes over memory) and
/// `memory_kib` its memory cost. Both trade CPU time for brute-force
/// resistance, so production values should be far above [`HashCost::MINIMAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub work_factor: u32,
    pub memory_kib: u32,
}

impl HashCost {
    /// Cheapest parameters Argon2 accepts. Only meant for tests.
    pub const MINIMAL: HashCost = HashCost {
        work_factor: Params::MIN_T_COST,
        memory_kib: Params::MIN_M_COST,
    };
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            work_factor: Params::DEFAULT_T_COST + 1,
            memory_kib: Params::DEFAULT_M_COST,
        }
    }
}

/// Salted one-way password hasher.
#[derive(Clone)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
    cost: HashCost,
    /// Hash checked when there is no stored hash to verify against.
    placeholder: String,
}

impl SecretHasher {
    /// Creates a hasher with the given cost.
    ///
    /// Fails with [`Error::HasherParams`] when Argon2 rejects the parameters
    /// (for instance a zero work factor). Hashes once to prepare
    /// [`SecretHasher::verify_missing`].
    pub fn new(cost: HashCost) -> Result<Self> {
        let params = Params::new(
            cost.memory_kib,
            cost.work_factor,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(Error::HasherParams)?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let placeholder = argon2
            .hash_password(PLACEHOLDER_SECRET.as_bytes(), &salt)?
            .to_string();

        Ok(Self {
            argon2,
            cost,
            placeholder,
        })
    }

    pub fn cost(&self) -> HashCost {
        self.cost
    }

    /// Hashes `pw` with a freshly generated salt.
    ///
    /// Calling this twice with the same password yields two different strings.
    pub fn hash(&self, pw: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self.argon2.hash_password(pw.as_bytes(), &salt)?.to_string())
    }

    /// Verifies `pw` against a stored hash.
    ///
    /// A wrong password is `Ok(false)`. Only a stored hash that cannot be
    /// parsed or uses unsupported parameters is an error.
    pub fn verify(&self, pw: &str, hash: &str) -> Result<bool> {
        let hash = PasswordHash::new(hash)?;

        match self.argon2.verify_password(pw.as_bytes(), &hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Spends the same work as [`SecretHasher::verify`] for an account that
    /// does not exist. Always `Ok(false)`.
    pub fn verify_missing(&self, pw: &str) -> Result<bool> {
        self.verify(pw, &self.placeholder).map(|_| false)
    }
}

impl fmt::Debug for SecretHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl From<password_hash::Error> for Error {
    fn from(value: password_hash::Error) -> Self {
        Self::PasswordHash(value)
    }
}
