//! Builds the application state from the resolved configuration.

use std::sync::Arc;

use bf_auth::{
    jwt::TokenService,
    secret_hash::{HashCost, SecretHasher},
};
use bf_config::bf_config::BfConfig;
use bf_models::{
    db::connection::DbConnection,
    user::store::{CredentialStore, MemoryStore},
};
use bf_web::state::AppState;
use chrono::TimeDelta;
use tracing::{info, warn};

use crate::prelude::*;

/// Token lifetime for the configured number of hours. `0` disables expiry.
pub fn token_lifetime(hours: u32) -> Option<TimeDelta> {
    (hours > 0).then(|| TimeDelta::hours(i64::from(hours)))
}

/// Opens the configured account store.
///
/// PostgreSQL when a database URL is set, with pending migrations applied.
/// Otherwise accounts are kept in memory and lost on restart.
pub fn open_store(config: &BfConfig) -> Result<Arc<dyn CredentialStore>> {
    match &config.database_url {
        Some(url) => {
            let db = DbConnection::new(url)?.setup()?;
            info!("Using PostgreSQL account store");
            Ok(Arc::new(db))
        }
        None => {
            warn!("No database configured, accounts are kept in memory only");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}

/// Creates the shared state for [`crate::api::router`] with the given store.
pub fn build_state_with_store(
    config: &BfConfig,
    store: Arc<dyn CredentialStore>,
) -> Result<AppState> {
    let tokens = TokenService::new(
        config.auth.secret_key.as_bytes(),
        token_lifetime(config.auth.token_lifetime_hours),
    )?;
    let hasher = SecretHasher::new(HashCost {
        work_factor: config.hasher.work_factor,
        memory_kib: config.hasher.memory_kib,
    })?;

    Ok(AppState::new(
        tokens,
        hasher,
        config.password_policy.clone(),
        store,
    ))
}

/// Creates the shared state for [`crate::api::router`].
pub fn build_state(config: &BfConfig) -> Result<AppState> {
    build_state_with_store(config, open_store(config)?)
}
