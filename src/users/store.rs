use async_trait::async_trait;

use crate::error::Error;
use crate::users::model::{User, UserRecord};

/// Raw storage contract for user rows.
///
/// No validation or hashing happens at this level: `create` inserts
/// exactly what it is given, `by_remember_hash` expects an
/// already-digested key, and `delete` trusts the id. Those concerns
/// belong to [`ValidatedStore`](crate::users::validate::ValidatedStore),
/// which wraps any implementation of this trait.
///
/// `Error::NotFound` is the only expected miss for the three lookups;
/// every other failure propagates as an opaque storage error.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by id.
    async fn by_id(&self, id: i64) -> Result<User, Error>;

    /// Look up a user by email.
    async fn by_email(&self, email: &str) -> Result<User, Error>;

    /// Look up a user by the digest of their remember token.
    async fn by_remember_hash(&self, remember_hash: &str) -> Result<User, Error>;

    /// Insert a row as given and return it with its assigned id.
    async fn create(&self, record: &UserRecord) -> Result<User, Error>;

    /// Full-row save of an existing user.
    async fn update(&self, user: &User) -> Result<(), Error>;

    /// Delete by id. The id is assumed caller-validated.
    async fn delete(&self, id: i64) -> Result<(), Error>;

    /// Idempotently ensure the users schema exists.
    async fn auto_migrate(&self) -> Result<(), Error>;

    /// Drop and re-create the users table, destroying all data. Gated by
    /// configuration and unreachable from production paths.
    async fn destructive_reset(&self) -> Result<(), Error>;

    /// Release the underlying connection resource.
    async fn close(&self) -> Result<(), Error>;
}
