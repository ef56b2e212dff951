use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::User;

/// Registration input. Every field may be absent; absence is reported as a
/// violation rather than a deserialization failure.
#[derive(Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &redacted(&self.password))
            .field("password_confirmation", &redacted(&self.password_confirmation))
            .finish()
    }
}

/// Request body for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_passwords() {
        let candidate = NewUser {
            email: Some("yuti@test.com".into()),
            password: Some("hunter22".into()),
            password_confirmation: Some("hunter22".into()),
            ..Default::default()
        };
        let out = format!("{:?}", candidate);
        assert!(out.contains("yuti@test.com"));
        assert!(!out.contains("hunter22"));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let candidate: NewUser = serde_json::from_str(r#"{"email":"yuti@test.com"}"#).unwrap();
        assert_eq!(candidate.email.as_deref(), Some("yuti@test.com"));
        assert!(candidate.password.is_none());
        assert!(candidate.first_name.is_none());
    }

    #[test]
    fn public_user_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "yuti@test.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: "Yuti".into(),
            last_name: "Reswick".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&PublicUser::from(user.clone())).unwrap();
        assert!(json.contains("yuti@test.com"));
        assert!(!json.contains("argon2"));

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
    }
}
