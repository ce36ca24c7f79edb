use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::error::Error;
use crate::users::model::{User, UserRecord};
use crate::users::store::UserStore;

/// Postgres-backed [`UserStore`].
///
/// Owns the connection pool and the users schema. Concurrency safety is
/// the pool's; each call is a single query with no cross-call transaction.
pub struct PgUserStore {
    pool: PgPool,
    allow_destructive: bool,
}

impl PgUserStore {
    /// Connect a pool using the supplied configuration.
    pub async fn connect(config: &AppConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self {
            pool,
            allow_destructive: config.allow_destructive,
        })
    }

    /// Wrap an existing pool.
    pub fn with_pool(pool: PgPool, allow_destructive: bool) -> Self {
        Self {
            pool,
            allow_destructive,
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn by_id(&self, id: i64) -> Result<User, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, remember_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or(Error::NotFound)
    }

    async fn by_email(&self, email: &str) -> Result<User, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, remember_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or(Error::NotFound)
    }

    async fn by_remember_hash(&self, remember_hash: &str) -> Result<User, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, remember_hash, created_at
            FROM users
            WHERE remember_hash = $1
            "#,
        )
        .bind(remember_hash)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or(Error::NotFound)
    }

    async fn create(&self, record: &UserRecord) -> Result<User, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, remember_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, remember_hash, created_at
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.remember_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, remember_hash = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.remember_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        // A miss affects zero rows; the backend reports success either way.
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn auto_migrate(&self) -> Result<(), Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                remember_hash TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn destructive_reset(&self) -> Result<(), Error> {
        if !self.allow_destructive {
            return Err(Error::ResetForbidden);
        }
        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(&self.pool)
            .await?;
        self.auto_migrate().await
    }

    async fn close(&self) -> Result<(), Error> {
        self.pool.close().await;
        Ok(())
    }
}
