use std::str::FromStr;

use anyhow::Context;

use crate::users::EmailLookup;

/// Where users are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub email_lookup: EmailLookup,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let storage = match var("USER_STORAGE").as_deref().unwrap_or("postgres") {
            "postgres" => StorageBackend::Postgres {
                database_url: var("DATABASE_URL")
                    .context("DATABASE_URL is required for postgres storage")?,
            },
            "memory" => StorageBackend::Memory,
            other => anyhow::bail!("unknown USER_STORAGE: {other}"),
        };

        let email_lookup = match var("AUTH_EMAIL_LOOKUP") {
            Some(v) => EmailLookup::from_str(&v)?,
            None => EmailLookup::default(),
        };

        let port = match var("APP_PORT") {
            Some(v) => v.parse::<u16>().context("APP_PORT")?,
            None => 8080,
        };

        Ok(Self {
            storage,
            email_lookup,
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }
}
