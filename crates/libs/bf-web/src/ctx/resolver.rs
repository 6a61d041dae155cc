//! Context resolver for extracting the caller's identity from HTTP requests.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use bf_auth::{CONNECTION_TOKEN_TYPE, jwt::TokenService};
use tracing::{debug, warn};

use crate::ctx::Ctx;
use crate::prelude::*;

/// Resolves the request context from the `Authorization` header.
///
/// * no header: [`Ctx::Unauthenticated`]; deciding whether that is acceptable
///   is left to the route guards
/// * `Bearer <token>` (scheme matched case-insensitively) with a token that verifies: [`Ctx::Authenticated`]
/// * anything else: an error. A presented credential is an authentication
///   attempt and has to be valid.
pub fn resolve_ctx(headers: &HeaderMap, tokens: &TokenService) -> Result<Ctx> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(Ctx::Unauthenticated);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|s| s.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(CONNECTION_TOKEN_TYPE))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(bf_auth::error::Error::MalformedCredential)?;

    let claim = tokens.verify(token)?;
    Ok(Ctx::authenticated(claim.sub))
}

/// Middleware for resolving request context from bearer tokens.
///
/// Adds the resulting [`Ctx`] to the request extensions, or rejects the
/// request with `401` when a credential was presented but does not verify.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use axum::Router;
/// use bf_auth::jwt::TokenService;
/// use bf_web::ctx::resolver::mw_ctx_resolver;
///
/// let tokens = Arc::new(TokenService::new(b"secret", None).unwrap());
/// let app: Router<()> = Router::new()
///     .layer(axum::middleware::from_fn_with_state(tokens, mw_ctx_resolver));
/// ```
#[axum::debug_middleware]
pub async fn mw_ctx_resolver(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let ctx = resolve_ctx(req.headers(), &tokens).inspect_err(|err| {
        warn!("Rejecting {} {}: {err}", req.method(), req.uri().path());
    })?;

    if let Some(subject) = ctx.subject() {
        debug!("Request authenticated as '{subject}'");
    }
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for Ctx {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Ctx>()
            .cloned()
            .ok_or(Error::CtxMissing)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::{TimeDelta, Utc};

    use super::*;

    fn tokens() -> TokenService {
        TokenService::new(b"resolver-secret", Some(TimeDelta::hours(1))).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn no_header_is_unauthenticated() {
        let ctx = resolve_ctx(&HeaderMap::new(), &tokens()).unwrap();
        assert_eq!(ctx, Ctx::Unauthenticated);
    }

    #[test]
    fn valid_bearer_is_authenticated() {
        let tokens = tokens();
        let token = tokens.issue("alice").unwrap();

        let ctx = resolve_ctx(&headers_with(&format!("Bearer {token}")), &tokens).unwrap();
        assert_eq!(ctx, Ctx::authenticated("alice"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let tokens = tokens();
        let token = tokens.issue("alice").unwrap();

        for scheme in ["bearer", "BEARER", "bEaReR"] {
            let ctx = resolve_ctx(&headers_with(&format!("{scheme} {token}")), &tokens).unwrap();
            assert_eq!(ctx, Ctx::authenticated("alice"), "{scheme}");
        }
    }

    #[test]
    fn present_but_invalid_is_rejected() {
        let tokens = tokens();
        let foreign = TokenService::new(b"other-secret", None)
            .unwrap()
            .issue("alice")
            .unwrap();
        let expired = tokens
            .issue_at("alice", Utc::now() - TimeDelta::hours(2))
            .unwrap();

        let cases = [
            ("Bearer garbage".to_string(), "malformed"),
            ("Bearer ".to_string(), "empty"),
            (format!("Basic {}", tokens.issue("alice").unwrap()), "scheme"),
            (format!("Bearer {foreign}"), "signature"),
            (format!("Bearer {expired}"), "expired"),
        ];
        for (value, case) in cases {
            let result = resolve_ctx(&headers_with(&value), &tokens);
            assert!(result.is_err(), "{case} credential should be rejected");
        }
    }

    #[test]
    fn failure_kinds_are_kept() {
        let tokens = tokens();
        let foreign = TokenService::new(b"other-secret", None)
            .unwrap()
            .issue("alice")
            .unwrap();

        assert!(matches!(
            resolve_ctx(&headers_with(&format!("Bearer {foreign}")), &tokens),
            Err(Error::Auth(bf_auth::error::Error::BadSignature))
        ));
        assert!(matches!(
            resolve_ctx(&headers_with("Token abc"), &tokens),
            Err(Error::Auth(bf_auth::error::Error::MalformedCredential))
        ));
    }
}
