use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{auth::token::Session, error::AppError, models::AuthUser};

/// The identity backend the auth context talks to.
///
/// Implementations own credential checks and session issuance; the context
/// only keeps the resulting user and session around.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Checks credentials and starts a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthUser, Session), AppError>;

    /// Creates an account with the given metadata and starts a session for it.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        user_metadata: Map<String, Value>,
    ) -> Result<(AuthUser, Session), AppError>;

    async fn sign_out(&self, session: &Session) -> Result<(), AppError>;

    /// Resolves the user behind an access token.
    async fn user_for_session(&self, access_token: &str) -> Result<AuthUser, AppError>;

    /// Merges `user_metadata` into the stored metadata of the session's user.
    async fn update_user_metadata(
        &self,
        session: &Session,
        user_metadata: Map<String, Value>,
    ) -> Result<AuthUser, AppError>;
}
