use crate::config::{AppConfig, StorageBackend};
use crate::users::{
    memory::InMemoryUserStorage, password::Argon2Scheme, repo::PgUserStorage, CredentialStore,
    EmailLookup, UserStorage,
};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<CredentialStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let storage = match &config.storage {
            StorageBackend::Postgres { database_url } => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .connect(database_url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;

                Arc::new(PgUserStorage::new(db)) as Arc<dyn UserStorage>
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory user storage; users are lost on restart");
                Arc::new(InMemoryUserStorage::new()) as Arc<dyn UserStorage>
            }
        };

        let store = Arc::new(CredentialStore::new(
            storage,
            Arc::new(Argon2Scheme),
            config.email_lookup,
        ));

        Ok(Self { config, store })
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<CredentialStore>) -> Self {
        Self { config, store }
    }

    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            storage: StorageBackend::Memory,
            email_lookup: EmailLookup::CaseInsensitive,
            host: "127.0.0.1".into(),
            port: 0,
        });
        let store = Arc::new(CredentialStore::new(
            Arc::new(InMemoryUserStorage::new()),
            Arc::new(Argon2Scheme),
            config.email_lookup,
        ));
        Self::from_parts(config, store)
    }
}
