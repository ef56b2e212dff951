use std::sync::Arc;

use tracing::{debug, error, info};

use crate::users::{
    dto::NewUser,
    error::{UserError, UserResult},
    password::PasswordScheme,
    repo::{EmailLookup, UserStorage},
    repo_types::{NewUserRecord, User},
    validation::{check_fields, Field, Reason, Violations},
};

/// Argon2id hash with the default cost parameters and a fixed salt. Never
/// matches a real password.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Validates candidates and authenticates credentials against a
/// [`UserStorage`].
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn UserStorage>,
    hasher: Arc<dyn PasswordScheme>,
    lookup: EmailLookup,
}

impl CredentialStore {
    pub fn new(
        storage: Arc<dyn UserStorage>,
        hasher: Arc<dyn PasswordScheme>,
        lookup: EmailLookup,
    ) -> Self {
        Self {
            storage,
            hasher,
            lookup,
        }
    }

    /// Runs every rule, including email uniqueness, and returns all failures.
    pub async fn validate(&self, candidate: &NewUser) -> UserResult<()> {
        let mut violations = check_fields(candidate);

        if let Some(email) = candidate.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if self.storage.exists_by_email_ci(email).await? {
                violations.push(Field::Email, Reason::NotUnique);
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            debug!(%violations, "candidate rejected");
            Err(UserError::ValidationFailed(violations))
        }
    }

    /// Validates the candidate and derives its password hash. The plaintext
    /// fields are consumed here.
    pub async fn prepare(&self, candidate: NewUser) -> UserResult<NewUserRecord> {
        self.validate(&candidate).await?;

        // presence was checked above
        let password = candidate.password.unwrap_or_default();
        let password_hash = self
            .hasher
            .hash(&password)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(NewUserRecord {
            email: candidate.email.unwrap_or_default(),
            password_hash,
            first_name: candidate.first_name.unwrap_or_default(),
            last_name: candidate.last_name.unwrap_or_default(),
        })
    }

    /// Prepares and persists a user. A concurrent registration that wins the
    /// email first surfaces here as `email not_unique`.
    pub async fn register(&self, candidate: NewUser) -> UserResult<User> {
        let record = self.prepare(candidate).await?;

        match self.storage.insert(record).await? {
            Some(user) => {
                info!(user_id = %user.id, "user registered");
                Ok(user)
            }
            None => {
                let mut violations = Violations::default();
                violations.push(Field::Email, Reason::NotUnique);
                Err(UserError::ValidationFailed(violations))
            }
        }
    }

    /// Returns the user when the email is known and the password matches,
    /// `None` otherwise. Both failure cases look the same to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> UserResult<Option<User>> {
        let Some(user) = self.storage.find_by_email(email, self.lookup).await? else {
            // burn one verify so unknown emails cost the same as wrong passwords
            let _ = self.hasher.verify(password, DUMMY_HASH);
            debug!("authenticate: no match");
            return Ok(None);
        };

        match self.hasher.verify(password, &user.password_hash) {
            Ok(true) => {
                debug!(user_id = %user.id, "authenticate: match");
                Ok(Some(user))
            }
            Ok(false) => {
                debug!("authenticate: no match");
                Ok(None)
            }
            Err(e) => {
                error!(error = %e, user_id = %user.id, "stored password hash is unreadable");
                Ok(None)
            }
        }
    }
}
