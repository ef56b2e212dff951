use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo::{EmailLookup, UserStorage};
use crate::users::repo_types::{NewUserRecord, User};

/// In-memory user storage for development and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStorage {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

fn same_email_ci(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UserStorage for InMemoryUserStorage {
    async fn find_by_email(
        &self,
        email: &str,
        lookup: EmailLookup,
    ) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| match lookup {
                EmailLookup::CaseInsensitive => same_email_ci(&u.email, email),
                EmailLookup::Exact => u.email == email,
            })
            .cloned();
        Ok(user)
    }

    async fn exists_by_email_ci(&self, email: &str) -> anyhow::Result<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| same_email_ci(&u.email, email)))
    }

    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;

        if users.values().any(|u| same_email_ci(&u.email, &record.email)) {
            return Ok(None);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: record.email,
            password_hash: record.password_hash,
            first_name: record.first_name,
            last_name: record.last_name,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, "user stored in memory");
        Ok(Some(user))
    }
}
