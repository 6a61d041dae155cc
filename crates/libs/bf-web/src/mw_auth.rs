//! Access guards for protecting routes.
//!
//! Guards only read the [`Ctx`] left by the resolver. `401` means no valid
//! authentication attempt was made; `403` means the caller is authenticated
//! but the route belongs to someone else.

use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use crate::ctx::Ctx;
use crate::prelude::*;

/// Passes if the request is authenticated, returning the subject.
pub fn require_authenticated(ctx: &Ctx) -> Result<&str> {
    ctx.subject().ok_or(Error::Unauthenticated)
}

/// Passes if the request is authenticated as `expected`.
///
/// # Examples
///
/// ```rust
/// use bf_web::{ctx::Ctx, mw_auth::require_matching_identity};
///
/// assert!(require_matching_identity(&Ctx::authenticated("alice"), "alice").is_ok());
/// assert!(require_matching_identity(&Ctx::authenticated("bob"), "alice").is_err());
/// ```
pub fn require_matching_identity(ctx: &Ctx, expected: &str) -> Result<()> {
    if require_authenticated(ctx)? != expected {
        return Err(Error::ApiForbidden);
    }
    Ok(())
}

/// Middleware that requires authentication for a route.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use bf_web::mw_auth::mw_require_auth;
///
/// let app: Router<()> = Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(axum::middleware::from_fn(mw_require_auth));
///
/// async fn protected_handler() -> &'static str {
///     "This requires authentication"
/// }
/// ```
pub async fn mw_require_auth(ctx: Ctx, req: Request, next: Next) -> Result<Response> {
    require_authenticated(&ctx)?;
    Ok(next.run(req).await)
}

/// Middleware that requires the caller to own the route's resource.
///
/// The state names the path parameter holding the owner's username. Must be
/// installed with `route_layer` so the path parameters are already matched.
pub async fn mw_require_matching_identity(
    State(param): State<&'static str>,
    ctx: Ctx,
    Path(params): Path<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Result<Response> {
    let expected = params.get(param).ok_or(Error::MissingRouteParam(param))?;
    require_matching_identity(&ctx, expected)?;
    Ok(next.run(req).await)
}

/// Creates a route layer that requires authentication.
///
/// # Examples
///
/// ```rust
/// use axum::{Router, routing::get};
/// use bf_web::require_auth;
///
/// let app: Router<()> = Router::new()
///     .route("/users/{username}", get(profile_handler))
///     .route_layer(require_auth!());
///
/// async fn profile_handler() -> &'static str {
///     "Any signed-in user gets here"
/// }
/// ```
#[macro_export]
macro_rules! require_auth {
    () => {{ axum::middleware::from_fn($crate::mw_auth::mw_require_auth) }};
}

/// Creates a route layer that only lets the owner named by a path parameter through.
///
/// # Examples
///
/// ```rust
/// use axum::{Router, routing::patch};
/// use bf_web::require_matching_identity;
///
/// let app: Router<()> = Router::new()
///     .route("/users/{username}", patch(update_handler))
///     .route_layer(require_matching_identity!("username"));
///
/// async fn update_handler() -> &'static str {
///     "Only the account owner gets here"
/// }
/// ```
#[macro_export]
macro_rules! require_matching_identity {
    ($param:expr) => {{
        axum::middleware::from_fn_with_state($param, $crate::mw_auth::mw_require_matching_identity)
    }};
}
