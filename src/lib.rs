//! Account-management core.
//!
//! Stores user identities, authenticates credentials, and issues/validates
//! long-lived remember tokens without ever persisting a secret in
//! recoverable form. Application code talks to [`UserService`], which
//! composes a validating layer over a storage gateway: passwords are
//! hashed with a deployment-wide pepper and remember tokens are reduced to
//! keyed digests before any row is read or written.

pub mod auth;
pub mod config;
pub mod error;
pub mod users;

pub use config::{AppConfig, SecretsConfig};
pub use error::Error;
pub use users::model::{CreatedUser, NewUser, User};
pub use users::repo::PgUserStore;
pub use users::service::UserService;
pub use users::store::UserStore;

/// Crate-wide result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
