use tracing::{debug, info, warn};

use crate::auth::digest::TokenDigest;
use crate::auth::password::CredentialHasher;
use crate::config::AppConfig;
use crate::error::Error;
use crate::users::model::{CreatedUser, NewUser, User};
use crate::users::repo::PgUserStore;
use crate::users::store::UserStore;
use crate::users::validate::{normalize_email, ValidatedStore};

/// Facade over the credential pipeline.
///
/// The only type application code talks to. Composes the validating layer
/// over a storage gateway at construction time and adds password
/// authentication on top of plain delegation.
pub struct UserService<S = PgUserStore> {
    store: ValidatedStore<S>,
}

impl UserService<PgUserStore> {
    /// Connect to Postgres and assemble the full pipeline.
    pub async fn connect(config: &AppConfig) -> Result<Self, Error> {
        let gateway = PgUserStore::connect(config).await?;
        Ok(Self::compose(gateway, config))
    }
}

impl<S: UserStore> UserService<S> {
    /// Assemble the pipeline over an arbitrary gateway.
    pub fn compose(gateway: S, config: &AppConfig) -> Self {
        let hasher = CredentialHasher::new(config.secrets.pepper.clone());
        let digest = TokenDigest::new(&config.secrets.hmac_key);
        Self {
            store: ValidatedStore::new(gateway, hasher, digest),
        }
    }

    /// Verify an email/password pair and return the matching user.
    ///
    /// An unknown email is `NotFound`; a wrong password is
    /// `InvalidPassword`. The two stay distinct so callers can log
    /// precisely while still showing end users a uniform message.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        let email = normalize_email(email);
        let user = self.store.by_email(&email).await?;
        if self.store.hasher().verify(&user.password_hash, password)? {
            debug!(user_id = user.id, "authenticated");
            Ok(user)
        } else {
            warn!(user_id = user.id, "authentication rejected: bad password");
            Err(Error::InvalidPassword)
        }
    }

    pub async fn by_id(&self, id: i64) -> Result<User, Error> {
        self.store.by_id(id).await
    }

    pub async fn by_email(&self, email: &str) -> Result<User, Error> {
        self.store.by_email(email).await
    }

    /// Look up the user owning a raw remember token.
    pub async fn by_remember(&self, token: &str) -> Result<User, Error> {
        self.store.by_remember(token).await
    }

    /// Create a user from credential input. The returned value carries
    /// the raw remember token exactly once.
    pub async fn create(&self, new_user: NewUser) -> Result<CreatedUser, Error> {
        let created = self.store.create(new_user).await?;
        info!(user_id = created.user.id, "user created");
        Ok(created)
    }

    /// Save a user, rotating the remember token when a new raw one is
    /// supplied. Returns the stored value.
    pub async fn update(&self, user: User, remember: Option<&str>) -> Result<User, Error> {
        self.store.update(user, remember).await
    }

    /// Delete a user by id. The id must be positive.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.store.delete(id).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }

    /// Idempotently ensure the users schema exists.
    pub async fn auto_migrate(&self) -> Result<(), Error> {
        self.store.auto_migrate().await
    }

    /// Drop and re-create the users table. Destroys all data; refused
    /// unless the configuration explicitly allows it.
    pub async fn destructive_reset(&self) -> Result<(), Error> {
        self.store.destructive_reset().await
    }

    /// Release the storage connection.
    pub async fn close(&self) -> Result<(), Error> {
        self.store.close().await
    }
}
