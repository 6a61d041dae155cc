//! Account records and their PostgreSQL queries.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::db::connection::DbConnection;
use crate::prelude::*;
use crate::schema::users;
use crate::user::store::CredentialStore;

/// A stored account. `hash` is the password hash and never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BfUser {
    pub username: String,
    pub hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A new account, password already hashed.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct BfUserCreate {
    pub username: String,
    pub hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Partial account update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = users)]
pub struct BfUserUpdate {
    pub hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl BfUserCreate {
    pub fn into_user(self, created_at: DateTime<Utc>) -> BfUser {
        BfUser {
            username: self.username,
            hash: self.hash,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            created_at,
        }
    }
}

impl BfUserUpdate {
    pub fn is_empty(&self) -> bool {
        self.hash.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
    }
}

impl BfUser {
    /// Applies the fields set in `changes`.
    pub fn apply(&mut self, changes: BfUserUpdate) {
        if let Some(hash) = changes.hash {
            self.hash = hash;
        }
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
    }
}

impl CredentialStore for DbConnection {
    fn find_by_subject(&self, username: &str) -> Result<BfUser> {
        let conn = &mut self.pool.get()?;
        users::table
            .find(username)
            .select(BfUser::as_select())
            .first(conn)
            .optional()?
            .ok_or(Error::NotFound)
    }

    fn create(&self, user: BfUserCreate) -> Result<BfUser> {
        let conn = &mut self.pool.get()?;
        diesel::insert_into(users::table)
            .values(&user)
            .returning(BfUser::as_returning())
            .get_result(conn)
            .map_err(|err| match err {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    Error::Conflict
                }
                err => Error::Diesel(err),
            })
    }

    fn list(&self) -> Result<Vec<BfUser>> {
        let conn = &mut self.pool.get()?;
        Ok(users::table
            .order(users::username.asc())
            .select(BfUser::as_select())
            .load(conn)?)
    }

    fn update(&self, username: &str, changes: BfUserUpdate) -> Result<BfUser> {
        if changes.is_empty() {
            return Err(Error::EmptyUpdate);
        }
        let conn = &mut self.pool.get()?;
        diesel::update(users::table.find(username))
            .set(&changes)
            .returning(BfUser::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or(Error::NotFound)
    }
}
