use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::auth::digest::TokenDigest;
use crate::auth::password::CredentialHasher;
use crate::auth::token;
use crate::error::Error;
use crate::users::model::{CreatedUser, NewUser, User, UserRecord};
use crate::users::store::UserStore;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validating decorator over a [`UserStore`].
///
/// Sits between the facade and raw storage: remember lookups take the raw
/// token here and leave as digests, every secret is hashed before a write
/// is issued, and structurally invalid input is rejected without touching
/// the store. Transforms return new values; inputs are never mutated.
pub struct ValidatedStore<S> {
    inner: S,
    hasher: CredentialHasher,
    digest: TokenDigest,
}

impl<S: UserStore> ValidatedStore<S> {
    pub fn new(inner: S, hasher: CredentialHasher, digest: TokenDigest) -> Self {
        Self {
            inner,
            hasher,
            digest,
        }
    }

    pub(crate) fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    pub async fn by_id(&self, id: i64) -> Result<User, Error> {
        self.inner.by_id(id).await
    }

    pub async fn by_email(&self, email: &str) -> Result<User, Error> {
        self.inner.by_email(email).await
    }

    /// Look up by the raw remember token. The token is digested here; the
    /// wrapped store only ever sees the lookup key.
    pub async fn by_remember(&self, token: &str) -> Result<User, Error> {
        self.inner.by_remember_hash(&self.digest.digest(token)).await
    }

    /// Hash and insert a new user.
    ///
    /// The email is normalized and checked, the password is hashed with
    /// the pepper, a remember token is generated when the caller did not
    /// bring one, and the token is digested for storage. All of that
    /// completes before the insert is issued, so an unhashed secret can
    /// never reach the store. The raw token is returned exactly once in
    /// the [`CreatedUser`].
    pub async fn create(&self, new_user: NewUser) -> Result<CreatedUser, Error> {
        let email = normalize_email(&new_user.email);
        if !is_valid_email(&email) {
            warn!(email = %email, "rejecting create: invalid email");
            return Err(Error::InvalidEmail);
        }

        let password_hash = self.hasher.hash(&new_user.password)?;
        let remember_token = match new_user.remember {
            Some(token) if !token.is_empty() => token,
            _ => token::remember_token()?,
        };
        let record = UserRecord {
            name: new_user.name,
            email,
            password_hash,
            remember_hash: self.digest.digest(&remember_token),
        };

        let user = self.inner.create(&record).await?;
        Ok(CreatedUser {
            user,
            remember_token,
        })
    }

    /// Save a user, re-digesting the remember hash when a new raw token
    /// is supplied. Returns the value that was stored.
    pub async fn update(&self, user: User, remember: Option<&str>) -> Result<User, Error> {
        let mut user = user;
        if let Some(token) = remember.filter(|t| !t.is_empty()) {
            user.remember_hash = self.digest.digest(token);
        }
        self.inner.update(&user).await?;
        Ok(user)
    }

    /// Delete by id, rejecting non-positive ids before storage is touched.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        if id <= 0 {
            warn!(id, "rejecting delete: non-positive id");
            return Err(Error::InvalidId);
        }
        self.inner.delete(id).await
    }

    pub async fn auto_migrate(&self) -> Result<(), Error> {
        self.inner.auto_migrate().await
    }

    pub async fn destructive_reset(&self) -> Result<(), Error> {
        self.inner.destructive_reset().await
    }

    pub async fn close(&self) -> Result<(), Error> {
        self.inner.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::testing::MemoryStore;

    fn store() -> ValidatedStore<MemoryStore> {
        ValidatedStore::new(
            MemoryStore::new(),
            CredentialHasher::new("unit-test-pepper"),
            TokenDigest::new("unit-test-hmac-key"),
        )
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: email.into(),
            password: "pw1".into(),
            remember: None,
        }
    }

    #[tokio::test]
    async fn create_hashes_password() {
        let store = store();
        let created = store.create(new_user("ann@x.com")).await.unwrap();

        assert_ne!(created.user.password_hash, "pw1");
        assert!(created.user.password_hash.starts_with("$argon2id$"));
        assert!(store
            .hasher()
            .verify(&created.user.password_hash, "pw1")
            .unwrap());
    }

    #[tokio::test]
    async fn create_generates_remember_token_when_absent() {
        let store = store();
        let created = store.create(new_user("ann@x.com")).await.unwrap();

        assert!(!created.remember_token.is_empty());
        assert_ne!(created.user.remember_hash, created.remember_token);
        let found = store.by_remember(&created.remember_token).await.unwrap();
        assert_eq!(found.id, created.user.id);
    }

    #[tokio::test]
    async fn create_adopts_supplied_remember_token() {
        let store = store();
        let mut input = new_user("ann@x.com");
        input.remember = Some("caller-chosen-token".into());
        let created = store.create(input).await.unwrap();

        assert_eq!(created.remember_token, "caller-chosen-token");
        let found = store.by_remember("caller-chosen-token").await.unwrap();
        assert_eq!(found.id, created.user.id);
    }

    #[tokio::test]
    async fn create_normalizes_email() {
        let store = store();
        let created = store.create(new_user("  Ann@X.Com ")).await.unwrap();
        assert_eq!(created.user.email, "ann@x.com");
    }

    #[tokio::test]
    async fn create_rejects_invalid_email_before_storage() {
        let store = store();
        let err = store.create(new_user("not-an-email")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidEmail));
        assert_eq!(store.inner.len(), 0);
    }

    #[tokio::test]
    async fn update_redigests_supplied_remember_token() -> anyhow::Result<()> {
        let store = store();
        let created = store.create(new_user("ann@x.com")).await?;
        let old_hash = created.user.remember_hash.clone();

        let updated = store.update(created.user, Some("fresh-token")).await?;
        assert_ne!(updated.remember_hash, old_hash);

        let found = store.by_remember("fresh-token").await?;
        assert_eq!(found.id, updated.id);
        Ok(())
    }

    #[tokio::test]
    async fn update_without_token_keeps_remember_hash() {
        let store = store();
        let created = store.create(new_user("ann@x.com")).await.unwrap();
        let old_hash = created.user.remember_hash.clone();

        let mut user = created.user;
        user.name = "Ann Again".into();
        let updated = store.update(user, None).await.unwrap();

        assert_eq!(updated.remember_hash, old_hash);
        assert_eq!(store.by_id(updated.id).await.unwrap().name, "Ann Again");
    }

    #[tokio::test]
    async fn delete_rejects_non_positive_ids_without_storage() {
        let store = store();
        assert!(matches!(store.delete(0).await, Err(Error::InvalidId)));
        assert!(matches!(store.delete(-3).await, Err(Error::InvalidId)));
        assert_eq!(store.inner.delete_calls(), 0);
    }

    #[tokio::test]
    async fn delete_removes_existing_user() {
        let store = store();
        let created = store.create(new_user("ann@x.com")).await.unwrap();

        store.delete(created.user.id).await.unwrap();
        assert!(matches!(
            store.by_id(created.user.id).await,
            Err(Error::NotFound)
        ));
    }

    #[tokio::test]
    async fn by_remember_misses_with_unknown_token() {
        let store = store();
        store.create(new_user("ann@x.com")).await.unwrap();
        assert!(matches!(
            store.by_remember("never-issued").await,
            Err(Error::NotFound)
        ));
    }
}
