//! Web layer of the bookfinder service.
//!
//! Request pipeline, in order:
//!
//! 1. [`ctx::resolver::mw_ctx_resolver`] turns the bearer credential (if any)
//!    into a [`ctx::Ctx`] stored on the request.
//! 2. [`mw_auth`] guards reject requests whose context does not satisfy the route.
//! 3. [`policy::PolicyChecked`] validates candidate passwords on
//!    credential-setting routes.
//! 4. Handlers call into [`bfuser`]. Bodies are read with
//!    [`extract::ApiJson`] so rejections keep the API error format.

pub mod bfuser;
pub mod ctx;
pub mod error;
pub mod extract;
pub mod mw_auth;
pub mod policy;
pub mod prelude;
pub mod state;
