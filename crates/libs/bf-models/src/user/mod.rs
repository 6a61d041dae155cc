//! Accounts: records, partial updates and the stores that keep them.

pub mod bfuser;
pub mod store;
