use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo_types::{NewUserRecord, User};

/// How `find_by_email` compares the submitted email with stored ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmailLookup {
    #[default]
    CaseInsensitive,
    Exact,
}

impl FromStr for EmailLookup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "case_insensitive" | "ci" => Ok(Self::CaseInsensitive),
            "exact" => Ok(Self::Exact),
            other => anyhow::bail!("unknown email lookup mode: {other}"),
        }
    }
}

/// Persistence boundary for users.
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn find_by_email(&self, email: &str, lookup: EmailLookup)
        -> anyhow::Result<Option<User>>;

    async fn exists_by_email_ci(&self, email: &str) -> anyhow::Result<bool>;

    /// Inserts unless a user with the same email (case-insensitive) exists.
    /// Returns `None` when the email is taken. Check and insert are atomic.
    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserStorage {
    db: PgPool,
}

impl PgUserStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStorage for PgUserStorage {
    async fn find_by_email(
        &self,
        email: &str,
        lookup: EmailLookup,
    ) -> anyhow::Result<Option<User>> {
        let sql = match lookup {
            EmailLookup::CaseInsensitive => {
                r#"
                SELECT id, email, password_hash, first_name, last_name, created_at
                FROM users
                WHERE lower(email) = lower($1)
                "#
            }
            EmailLookup::Exact => {
                r#"
                SELECT id, email, password_hash, first_name, last_name, created_at
                FROM users
                WHERE email = $1
                "#
            }
        };
        let user = sqlx::query_as::<_, User>(sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .context("find user by email")?;
        Ok(user)
    }

    async fn exists_by_email_ci(&self, email: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1))"#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
        .context("check email exists")?;
        Ok(exists)
    }

    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<Option<User>> {
        // users_email_lower_key makes the conflict check atomic
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            RETURNING id, email, password_hash, first_name, last_name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .fetch_optional(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }
}
