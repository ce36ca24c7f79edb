use thiserror::Error;

/// Errors produced by the credential pipeline.
///
/// The sentinel variants (`NotFound`, `InvalidId`, `InvalidPassword`,
/// `InvalidEmail`, `ResetForbidden`) are expected outcomes callers branch
/// on; everything else is an opaque backend or algorithm failure that
/// propagates unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// No user matched the lookup key.
    #[error("user not found")]
    NotFound,

    /// A delete was attempted with an id that is not positive.
    #[error("id must be greater than zero")]
    InvalidId,

    /// Authentication failed on the password check. Kept distinct from
    /// `NotFound` so callers decide how much to disclose to end users.
    #[error("invalid password")]
    InvalidPassword,

    /// The supplied email address is structurally invalid.
    #[error("invalid email address")]
    InvalidEmail,

    /// A destructive reset was requested without the configuration
    /// explicitly allowing it.
    #[error("destructive reset is disabled by configuration")]
    ResetForbidden,

    /// Password hashing or verification failed (malformed digest,
    /// algorithm error). Never raised for a plain mismatch.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The OS entropy source failed while generating a token.
    #[error("token generation failed: {0}")]
    TokenEntropy(String),

    /// A required configuration value is absent from the environment.
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),

    /// Opaque storage backend failure.
    #[error("storage backend error")]
    Store(#[from] sqlx::Error),
}
