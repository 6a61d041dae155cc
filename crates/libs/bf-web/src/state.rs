//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;
use bf_auth::{jwt::TokenService, password_policy::PasswordPolicy, secret_hash::SecretHasher};
use bf_models::user::store::CredentialStore;

/// Everything handlers need, built once at startup and shared read-only.
///
/// Each field can be extracted on its own with `State<...>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub hasher: Arc<SecretHasher>,
    pub policy: Arc<PasswordPolicy>,
    pub store: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        hasher: SecretHasher,
        policy: PasswordPolicy,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            tokens: Arc::new(tokens),
            hasher: Arc::new(hasher),
            policy: Arc::new(policy),
            store,
        }
    }
}
