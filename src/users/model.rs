use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Credential input for creating a user.
///
/// The only shape that ever holds clear-text. It is consumed by
/// [`create`](crate::users::service::UserService::create) and never
/// reaches storage.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Raw remember token to adopt; one is generated when absent.
    pub remember: Option<String>,
}

/// Stored user row. Carries only the one-way hash fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64, // system-assigned, positive
    pub name: String,
    pub email: String, // unique, authentication lookup key
    #[serde(skip_serializing)]
    pub password_hash: String, // peppered argon2 digest
    #[serde(skip_serializing)]
    pub remember_hash: String, // keyed digest of the remember token, unique
    pub created_at: OffsetDateTime,
}

/// Result of a successful create: the stored row plus the raw remember
/// token, handed back exactly once (e.g. to set a client-side cookie).
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: User,
    pub remember_token: String,
}

/// Row shape handed to the gateway on insert; hashes already populated.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub remember_hash: String,
}
