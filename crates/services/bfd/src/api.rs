//! HTTP routes of the bookfinder service.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
};
use bf_web::{
    bfuser::{
        self, BfUserApi, BfUserLogin, BfUserLoginRequest, BfUserName, BfUserPatch, BfUserPost,
    },
    ctx::resolver::mw_ctx_resolver,
    error::Error as WebError,
    extract::ApiJson,
    policy::PolicyChecked,
    prelude::Result as WebResult,
    require_auth, require_matching_identity,
    state::AppState,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

fn v1(path: &str) -> String {
    format!("/v1/{path}")
}

/// Builds the service router.
///
/// Every request passes the identity resolver first. Routes are then
/// grouped by the guard they need.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route(&v1("auth/register"), post(register))
        .route(&v1("auth/token"), post(token))
        .route(&v1("users"), get(list_users).post(create_user));

    let authenticated_routes = Router::new()
        .route(&v1("users/{username}"), get(get_user))
        .route_layer(require_auth!());

    let owner_routes = Router::new()
        .route(&v1("users/{username}"), patch(patch_user))
        .route_layer(require_matching_identity!("username"));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(owner_routes)
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            mw_ctx_resolver,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Server is running!"
}

async fn fallback() -> WebError {
    WebError::RouteNotFound
}

async fn register(
    State(state): State<AppState>,
    PolicyChecked(payload): PolicyChecked<BfUserPost>,
) -> WebResult<(StatusCode, Json<BfUserLogin>)> {
    let login = bfuser::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(login)))
}

async fn token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BfUserLoginRequest>,
) -> WebResult<Json<BfUserLogin>> {
    Ok(Json(bfuser::login(&state, payload).await?))
}

async fn list_users(State(state): State<AppState>) -> WebResult<Json<Vec<BfUserName>>> {
    Ok(Json(bfuser::list_users(&state)?))
}

async fn create_user(
    State(state): State<AppState>,
    PolicyChecked(payload): PolicyChecked<BfUserPost>,
) -> WebResult<(StatusCode, Json<BfUserApi>)> {
    let user = bfuser::create_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> WebResult<Json<BfUserApi>> {
    Ok(Json(bfuser::fetch_user(&state, &username)?))
}

async fn patch_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    PolicyChecked(patch): PolicyChecked<BfUserPatch>,
) -> WebResult<Json<BfUserApi>> {
    Ok(Json(bfuser::update_user(&state, &username, patch).await?))
}
