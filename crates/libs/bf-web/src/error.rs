//! Main Crate Error

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::{error, warn};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] bf_auth::error::Error),

    #[error(transparent)]
    Models(#[from] bf_models::error::Error),

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),

    /* Api Errors */
    #[error("Authentication required")]
    Unauthenticated,

    #[error("API Forbidden")]
    ApiForbidden,

    #[error("Wrong Credentials")]
    WrongCredentials,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Route Not Found")]
    RouteNotFound,

    #[error("Route has no '{0}' parameter")]
    MissingRouteParam(&'static str),

    #[error("Context Missing")]
    CtxMissing,
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, String) {
        use bf_auth::error::Error as AuthError;
        use bf_models::error::Error as ModelsError;

        let (status, message) = match self {
            Error::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
            Error::WrongCredentials => (StatusCode::UNAUTHORIZED, "Invalid username/password"),
            Error::ApiForbidden => (StatusCode::FORBIDDEN, "Access forbidden"),
            Error::InvalidPayload(reason) => return (StatusCode::BAD_REQUEST, reason.clone()),
            Error::RouteNotFound => (StatusCode::NOT_FOUND, "Not Found"),
            Error::Auth(err) => match err {
                AuthError::MalformedCredential => {
                    (StatusCode::UNAUTHORIZED, "Malformed authentication token")
                }
                AuthError::BadSignature => {
                    (StatusCode::UNAUTHORIZED, "Invalid authentication token")
                }
                AuthError::TokenExpired => {
                    (StatusCode::UNAUTHORIZED, "Authentication token expired")
                }
                AuthError::WeakPassword(weak) => {
                    return (StatusCode::BAD_REQUEST, weak.to_string());
                }
                AuthError::MissingSecret
                | AuthError::TokenCreation
                | AuthError::TokenEncoding(_)
                | AuthError::PasswordHash(_)
                | AuthError::HasherParams(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            Error::Models(err) => match err {
                ModelsError::NotFound => (StatusCode::NOT_FOUND, "User not found"),
                ModelsError::Conflict => (StatusCode::CONFLICT, "Username already taken"),
                ModelsError::EmptyUpdate => (StatusCode::BAD_REQUEST, "No data"),
                ModelsError::Poisoned
                | ModelsError::Migration(_)
                | ModelsError::R2D2(_)
                | ModelsError::Diesel(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            Error::Join(_) | Error::MissingRouteParam(_) | Error::CtxMissing => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (status, String::from(message))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Creating API error response for error: {:?}", self);
        } else {
            warn!("Rejecting request with {}: {}", status.as_u16(), self);
        }

        let body = Json(json!({
            "error": {
                "message": message,
                "status": status.as_u16()
            }
        }));
        (status, body).into_response()
    }
}
