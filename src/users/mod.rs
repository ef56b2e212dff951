use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validation;

pub use error::{UserError, UserResult};
pub use repo::{EmailLookup, UserStorage};
pub use repo_types::User;
pub use services::CredentialStore;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::user_routes())
        .merge(handlers::session_routes())
}
