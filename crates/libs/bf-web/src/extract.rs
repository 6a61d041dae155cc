//! Request body extraction with API error responses.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::prelude::*;

/// JSON body extractor whose rejections use the API error body.
///
/// Malformed or incomplete bodies become [`Error::InvalidPayload`] (`400`)
/// instead of axum's plain-text rejection.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(payload)| Self(payload))
            .map_err(|rejection| Error::InvalidPayload(rejection.body_text()))
    }
}
