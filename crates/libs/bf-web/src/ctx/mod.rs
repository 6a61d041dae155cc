//! Request identity context.
//!
//! Every request that passed [`resolver::mw_ctx_resolver`] carries exactly one
//! [`Ctx`] in its extensions. It lives and dies with the request.

pub mod resolver;

/// The account a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtxUser {
    /// Username taken from the token subject.
    pub username: String,
}

/// Request context: who, if anyone, the request is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ctx {
    /// No bearer credential was presented.
    Unauthenticated,
    /// A valid bearer credential was presented for this account.
    Authenticated(CtxUser),
}

impl Ctx {
    /// Creates an authenticated context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bf_web::ctx::Ctx;
    ///
    /// let ctx = Ctx::authenticated("alice");
    /// assert_eq!(ctx.subject(), Some("alice"));
    /// assert_eq!(Ctx::Unauthenticated.subject(), None);
    /// ```
    pub fn authenticated(username: impl Into<String>) -> Self {
        Self::Authenticated(CtxUser {
            username: username.into(),
        })
    }

    /// Username of the authenticated account, if any.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Ctx::Authenticated(user) => Some(&user.username),
            Ctx::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Ctx::Authenticated(_))
    }
}
