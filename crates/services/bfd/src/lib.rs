//! Bookfinder Service (bfd)
//!
//! Serves the account API of the bookfinder catalog:
//!
//! - **Registration and login**: issue bearer tokens for accounts
//! - **Profiles**: readable by any signed-in user, editable only by their owner
//! - **Storage**: PostgreSQL when `database_url` is configured, memory otherwise
//!
//! The binary loads [`bf_config::bf_config::BfConfig`], builds the state with
//! [`setup::build_state`] and serves [`api::router`].

pub mod api;
pub mod cli;
pub mod error;
pub mod prelude;
pub mod setup;
