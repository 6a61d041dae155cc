//! Password policy enforcement for credential-setting routes.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequest, Request};
use bf_auth::password_policy::PasswordPolicy;
use serde::de::DeserializeOwned;

use crate::extract::ApiJson;
use crate::prelude::*;

/// A request payload that may carry a new password.
pub trait CandidatePassword {
    /// The password the request wants to set, if it sets one.
    fn candidate_password(&self) -> Option<&str>;
}

/// JSON body whose candidate password satisfied the [`PasswordPolicy`].
///
/// Rejects with `400` before the handler runs, so nothing is hashed or
/// stored for a weak password. Consumes the body, so it has to be the last
/// handler argument.
#[derive(Debug, Clone)]
pub struct PolicyChecked<T>(pub T);

impl<S, T> FromRequest<S> for PolicyChecked<T>
where
    S: Send + Sync,
    T: DeserializeOwned + CandidatePassword + Send,
    Arc<PasswordPolicy>: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let ApiJson(payload) = ApiJson::<T>::from_request(req, state).await?;

        if let Some(candidate) = payload.candidate_password() {
            Arc::<PasswordPolicy>::from_ref(state)
                .validate(candidate)
                .map_err(bf_auth::error::Error::from)?;
        }

        Ok(Self(payload))
    }
}
