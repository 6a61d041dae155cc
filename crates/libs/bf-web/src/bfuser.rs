//! Account operations behind the HTTP handlers.

use std::sync::Arc;

use bf_auth::{CONNECTION_TOKEN_TYPE, secret_hash::SecretHasher};
use bf_models::{
    error::Error as ModelsError,
    user::bfuser::{BfUser, BfUserCreate, BfUserUpdate},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::{info, warn};

use crate::policy::CandidatePassword;
use crate::prelude::*;
use crate::state::AppState;

/// Longest username the account table accepts.
pub const MAX_USERNAME_LEN: usize = 64;

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BfUserApi {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Username-only entry of the account listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BfUserName {
    pub username: String,
}

/// Request body for creating an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BfUserPost {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// Request body for exchanging credentials for a token.
#[derive(Debug, Clone, Deserialize)]
pub struct BfUserLoginRequest {
    pub username: String,
    pub password: String,
}

/// Partial profile update. Missing or empty fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BfUserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token response for register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BfUserLogin {
    pub access_token: String,
    pub token_type: String,
    pub user: BfUserApi,
}

impl From<BfUser> for BfUserApi {
    fn from(user: BfUser) -> Self {
        Self {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

impl CandidatePassword for BfUserPost {
    fn candidate_password(&self) -> Option<&str> {
        Some(&self.password)
    }
}

impl CandidatePassword for BfUserPatch {
    fn candidate_password(&self) -> Option<&str> {
        non_empty(self.password.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn check_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::InvalidPayload(String::from("Username must not be empty")));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(Error::InvalidPayload(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

async fn hash_password(hasher: &Arc<SecretHasher>, password: String) -> Result<String> {
    let hasher = Arc::clone(hasher);
    Ok(task::spawn_blocking(move || hasher.hash(&password)).await??)
}

async fn verify_password(hasher: &Arc<SecretHasher>, password: String, hash: String) -> Result<bool> {
    let hasher = Arc::clone(hasher);
    Ok(task::spawn_blocking(move || hasher.verify(&password, &hash)).await??)
}

fn login_response(state: &AppState, user: BfUser) -> Result<BfUserLogin> {
    let access_token = state.tokens.issue(&user.username)?;
    Ok(BfUserLogin {
        access_token,
        token_type: String::from(CONNECTION_TOKEN_TYPE),
        user: user.into(),
    })
}

/// Creates an account. The password must already have passed the policy.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use bf_auth::{
///     jwt::TokenService, password_policy::PasswordPolicy,
///     secret_hash::{HashCost, SecretHasher},
/// };
/// use bf_models::user::store::MemoryStore;
/// use bf_web::{bfuser::{BfUserPost, create_user}, state::AppState};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let state = AppState::new(
///     TokenService::new(b"secret", None)?,
///     SecretHasher::new(HashCost::MINIMAL)?,
///     PasswordPolicy::default(),
///     Arc::new(MemoryStore::default()),
/// );
/// let payload = BfUserPost {
///     username: "alice".to_string(),
///     password: "Str0ng!Pass".to_string(),
///     first_name: "Alice".to_string(),
///     last_name: "Liddell".to_string(),
///     email: "alice@example.com".to_string(),
/// };
/// let user = create_user(&state, payload).await?;
/// assert_eq!(user.username, "alice");
/// # Ok(())
/// # }
/// ```
pub async fn create_user(state: &AppState, payload: BfUserPost) -> Result<BfUserApi> {
    Ok(create_account(state, payload).await?.into())
}

async fn create_account(state: &AppState, payload: BfUserPost) -> Result<BfUser> {
    check_username(&payload.username)?;
    let hash = hash_password(&state.hasher, payload.password).await?;

    let user = state.store.create(BfUserCreate {
        username: payload.username,
        hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
    })?;
    info!("Created account '{}'", user.username);
    Ok(user)
}

/// Creates an account and signs the new user in.
pub async fn register(state: &AppState, payload: BfUserPost) -> Result<BfUserLogin> {
    let user = create_account(state, payload).await?;
    login_response(state, user)
}

/// Exchanges a username and password for a session token.
///
/// Unknown usernames and wrong passwords are indistinguishable to the caller,
/// both in the response and in the hashing work spent.
pub async fn login(state: &AppState, payload: BfUserLoginRequest) -> Result<BfUserLogin> {
    let user = match state.store.find_by_subject(&payload.username) {
        Ok(user) => user,
        Err(ModelsError::NotFound) => {
            warn!("Login attempt for unknown account '{}'", payload.username);
            let hasher = Arc::clone(&state.hasher);
            task::spawn_blocking(move || hasher.verify_missing(&payload.password)).await??;
            return Err(Error::WrongCredentials);
        }
        Err(err) => return Err(err.into()),
    };

    if !verify_password(&state.hasher, payload.password, user.hash.clone()).await? {
        warn!("Wrong password for account '{}'", user.username);
        return Err(Error::WrongCredentials);
    }

    login_response(state, user)
}

/// Fetches one account's public profile.
pub fn fetch_user(state: &AppState, username: &str) -> Result<BfUserApi> {
    Ok(state.store.find_by_subject(username)?.into())
}

/// Lists every account by username.
pub fn list_users(state: &AppState) -> Result<Vec<BfUserName>> {
    Ok(state
        .store
        .list()?
        .into_iter()
        .map(|user| BfUserName {
            username: user.username,
        })
        .collect())
}

/// Applies a partial profile update, rehashing the password if a new one is given.
pub async fn update_user(state: &AppState, username: &str, patch: BfUserPatch) -> Result<BfUserApi> {
    let hash = match non_empty(patch.password.as_deref()) {
        Some(password) => Some(hash_password(&state.hasher, String::from(password)).await?),
        None => None,
    };

    let changes = BfUserUpdate {
        hash,
        first_name: patch.first_name.filter(|value| !value.is_empty()),
        last_name: patch.last_name.filter(|value| !value.is_empty()),
        email: patch.email.filter(|value| !value.is_empty()),
    };

    let user = state.store.update(username, changes)?;
    info!("Updated account '{}'", user.username);
    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use bf_auth::{
        jwt::TokenService,
        password_policy::PasswordPolicy,
        secret_hash::HashCost,
    };
    use bf_models::user::store::MemoryStore;

    use super::*;

    fn state() -> AppState {
        AppState::new(
            TokenService::new(b"test-secret", None).unwrap(),
            SecretHasher::new(HashCost::MINIMAL).unwrap(),
            PasswordPolicy::default(),
            Arc::new(MemoryStore::default()),
        )
    }

    fn alice() -> BfUserPost {
        BfUserPost {
            username: String::from("alice"),
            password: String::from("Str0ng!Pass"),
            first_name: String::from("Alice"),
            last_name: String::from("Liddell"),
            email: String::from("alice@example.com"),
        }
    }

    fn credentials(password: &str) -> BfUserLoginRequest {
        BfUserLoginRequest {
            username: String::from("alice"),
            password: String::from(password),
        }
    }

    #[tokio::test]
    async fn register_issues_a_token_for_the_new_account() {
        let state = state();
        let login = register(&state, alice()).await.unwrap();

        assert_eq!(login.token_type, "Bearer");
        assert_eq!(login.user.username, "alice");
        assert_eq!(state.tokens.verify(&login.access_token).unwrap().sub, "alice");
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let state = state();
        create_user(&state, alice()).await.unwrap();

        let stored = state.store.find_by_subject("alice").unwrap();
        assert_ne!(stored.hash, "Str0ng!Pass");
        assert!(state.hasher.verify("Str0ng!Pass", &stored.hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let state = state();
        create_user(&state, alice()).await.unwrap();

        let err = create_user(&state, alice()).await.unwrap_err();
        assert!(matches!(err, Error::Models(ModelsError::Conflict)));
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let mut payload = alice();
        payload.username = String::from("  ");

        let err = create_user(&state(), payload).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn login_checks_the_password() {
        let state = state();
        create_user(&state, alice()).await.unwrap();

        assert!(login(&state, credentials("Str0ng!Pass")).await.is_ok());
        assert!(matches!(
            login(&state, credentials("Wr0ng!Pass")).await,
            Err(Error::WrongCredentials)
        ));
    }

    #[tokio::test]
    async fn unknown_account_looks_like_a_wrong_password() {
        assert!(matches!(
            login(&state(), credentials("Str0ng!Pass")).await,
            Err(Error::WrongCredentials)
        ));
    }

    #[tokio::test]
    async fn update_keeps_unset_and_empty_fields() {
        let state = state();
        create_user(&state, alice()).await.unwrap();

        let patch = BfUserPatch {
            first_name: Some(String::from("Alicia")),
            last_name: Some(String::new()),
            ..Default::default()
        };
        let user = update_user(&state, "alice", patch).await.unwrap();

        assert_eq!(user.first_name, "Alicia");
        assert_eq!(user.last_name, "Liddell");
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn update_rehashes_a_new_password() {
        let state = state();
        create_user(&state, alice()).await.unwrap();

        let patch = BfUserPatch {
            password: Some(String::from("N3w!Password")),
            ..Default::default()
        };
        update_user(&state, "alice", patch).await.unwrap();

        assert!(login(&state, credentials("N3w!Password")).await.is_ok());
        assert!(login(&state, credentials("Str0ng!Pass")).await.is_err());
    }

    #[tokio::test]
    async fn listing_only_exposes_usernames() {
        let state = state();
        create_user(&state, alice()).await.unwrap();

        assert_eq!(
            list_users(&state).unwrap(),
            vec![BfUserName {
                username: String::from("alice")
            }]
        );
        assert!(matches!(
            fetch_user(&state, "bob"),
            Err(Error::Models(ModelsError::NotFound))
        ));
    }
}
