use async_trait::async_trait;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use taskmarket::auth::{AuthContext, IdentityProvider, Session, SessionKeys};
use taskmarket::components::{Component, FormError};
use taskmarket::models::AuthUser;
use taskmarket::AppError;
use uuid::Uuid;

// In-memory stand-in for the identity backend.
struct MemoryProvider {
    keys: SessionKeys,
    accounts: Mutex<HashMap<String, (String, AuthUser)>>,
    sign_outs: Mutex<u32>,
    database_down: bool,
}

impl MemoryProvider {
    fn new() -> Self {
        Self {
            keys: SessionKeys::new("memory-provider-secret", Duration::hours(1)),
            accounts: Mutex::new(HashMap::new()),
            sign_outs: Mutex::new(0),
            database_down: false,
        }
    }

    fn with_database_down(mut self) -> Self {
        self.database_down = true;
        self
    }

    fn with_account(self, email: &str, password: &str, metadata: Value) -> Self {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            user_metadata: metadata.as_object().cloned().unwrap_or_default(),
            created_at: Some(Utc::now()),
        };
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    fn sign_out_count(&self) -> u32 {
        *self.sign_outs.lock().unwrap()
    }
}

#[async_trait]
impl IdentityProvider for MemoryProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthUser, Session), AppError> {
        if self.database_down {
            return Err(AppError::DatabaseError(
                "error communicating with database: postgres://app:hunter2@db:5432/market".into(),
            ));
        }
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some((stored, user)) if stored == password => {
                Ok((user.clone(), self.keys.issue(user.id)?))
            }
            _ => Err(AppError::Unauthorized("Invalid login credentials".into())),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        user_metadata: Map<String, Value>,
    ) -> Result<(AuthUser, Session), AppError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(AppError::BadRequest("User already registered".into()));
        }
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            user_metadata,
            created_at: Some(Utc::now()),
        };
        accounts.insert(email.to_string(), (password.to_string(), user.clone()));
        Ok((user.clone(), self.keys.issue(user.id)?))
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AppError> {
        self.keys.verify(&session.access_token)?;
        *self.sign_outs.lock().unwrap() += 1;
        Ok(())
    }

    async fn user_for_session(&self, access_token: &str) -> Result<AuthUser, AppError> {
        let claims = self.keys.verify(access_token)?;
        let accounts = self.accounts.lock().unwrap();
        accounts
            .values()
            .map(|(_, user)| user)
            .find(|user| user.id == claims.sub)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("User not found".into()))
    }

    async fn update_user_metadata(
        &self,
        session: &Session,
        user_metadata: Map<String, Value>,
    ) -> Result<AuthUser, AppError> {
        let claims = self.keys.verify(&session.access_token)?;
        let mut accounts = self.accounts.lock().unwrap();
        let (_, user) = accounts
            .values_mut()
            .find(|(_, user)| user.id == claims.sub)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.user_metadata.extend(user_metadata);
        Ok(user.clone())
    }
}

fn provider_with_alice() -> MemoryProvider {
    MemoryProvider::new().with_account(
        "alice@example.com",
        "password123",
        json!({ "name": "Alice", "experience": 5 }),
    )
}

#[actix_rt::test]
async fn test_new_context_is_loading_until_initialized() {
    let mut auth = AuthContext::new(MemoryProvider::new());
    assert!(auth.is_loading());
    assert!(auth.user().is_none());

    auth.initialize(None).await;
    assert!(!auth.is_loading());
    assert!(!auth.is_authenticated());
    assert_eq!(auth.error(), "");
}

#[actix_rt::test]
async fn test_login_exposes_formatted_user() {
    let mut auth = AuthContext::new(provider_with_alice());
    auth.login("alice@example.com", "password123").await.unwrap();

    let user = auth.user().expect("user after login");
    assert_eq!(user.name, "Alice");
    assert_eq!(user.experience, 5.0);
    assert_eq!(auth.session().unwrap().user_id, user.id());
    assert!(auth.is_authenticated());
    assert!(!auth.is_loading());
    assert_eq!(auth.error(), "");
}

#[actix_rt::test]
async fn test_failed_login_sets_banner_message() {
    let mut auth = AuthContext::new(provider_with_alice());
    let result = auth.login("alice@example.com", "wrong-password").await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    assert_eq!(auth.error(), "Invalid login credentials");
    assert!(!auth.is_authenticated());
    assert_eq!(
        FormError::new(auth.error()).render(),
        r#"<div class="form-error" role="alert">Invalid login credentials</div>"#
    );

    auth.login("alice@example.com", "password123").await.unwrap();
    assert_eq!(auth.error(), "");
    assert_eq!(FormError::new(auth.error()).render(), "");
}

#[actix_rt::test]
async fn test_login_validates_before_calling_provider() {
    let mut auth = AuthContext::new(provider_with_alice());
    let result = auth.login("not-an-email", "password123").await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert!(auth.error().contains("valid email"));
}

#[actix_rt::test]
async fn test_signup_returns_user_with_zero_experience() {
    let mut auth = AuthContext::new(MemoryProvider::new());
    let user = auth
        .signup("  Bob Builder ", "bob@example.com", "password123")
        .await
        .unwrap();

    assert_eq!(user.name, "Bob Builder");
    assert_eq!(user.experience, 0.0);
    assert_eq!(auth.user(), Some(&user));
    assert!(auth.session().is_some());

    let duplicate = auth.signup("Bob", "bob@example.com", "password123").await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));
    assert_eq!(auth.error(), "User already registered");
}

#[actix_rt::test]
async fn test_logout_clears_state() {
    let mut auth = AuthContext::new(provider_with_alice());
    auth.login("alice@example.com", "password123").await.unwrap();

    auth.logout().await.unwrap();
    assert!(auth.user().is_none());
    assert!(auth.session().is_none());
    assert_eq!(auth.provider().sign_out_count(), 1);

    // Logging out again is a no-op.
    auth.logout().await.unwrap();
    assert_eq!(auth.provider().sign_out_count(), 1);
}

#[actix_rt::test]
async fn test_update_experience_adds_hours() {
    let mut auth = AuthContext::new(provider_with_alice());
    auth.login("alice@example.com", "password123").await.unwrap();

    auth.update_experience(2.5).await.unwrap();
    assert_eq!(auth.user().unwrap().experience, 7.5);
    assert_eq!(auth.user().unwrap().name, "Alice");

    auth.update_experience(-100.0).await.unwrap();
    assert_eq!(auth.user().unwrap().experience, 0.0);
}

#[actix_rt::test]
async fn test_update_experience_requires_session_and_finite_hours() {
    let mut auth = AuthContext::new(provider_with_alice());
    let result = auth.update_experience(1.0).await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    assert!(!auth.error().is_empty());

    auth.login("alice@example.com", "password123").await.unwrap();
    let result = auth.update_experience(f64::NAN).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(auth.user().unwrap().experience, 5.0);
}

#[actix_rt::test]
async fn test_update_experience_rejects_overflowing_total() {
    let mut auth = AuthContext::new(provider_with_alice());
    auth.login("alice@example.com", "password123").await.unwrap();

    auth.update_experience(f64::MAX).await.unwrap();
    let stored = auth.user().unwrap().experience;
    assert!(stored.is_finite());

    let result = auth.update_experience(f64::MAX).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(auth.error(), "Experience hours are out of range");
    assert_eq!(auth.user().unwrap().experience, stored);

    let session = auth.session().cloned().unwrap();
    let persisted = auth
        .provider()
        .user_for_session(&session.access_token)
        .await
        .unwrap();
    assert_eq!(persisted.user_metadata["experience"], json!(stored));
}

#[actix_rt::test]
async fn test_backend_failure_shows_generic_banner() {
    let mut auth = AuthContext::new(provider_with_alice().with_database_down());
    let result = auth.login("alice@example.com", "password123").await;

    assert!(matches!(result, Err(AppError::DatabaseError(_))));
    assert_eq!(auth.error(), "Something went wrong, please try again");
    let banner = FormError::new(auth.error()).render();
    assert!(!banner.contains("postgres://"));
    assert!(!banner.contains("hunter2"));
}

#[actix_rt::test]
async fn test_initialize_restores_session() {
    let provider = provider_with_alice();
    let (_, session) = provider
        .sign_in_with_password("alice@example.com", "password123")
        .await
        .unwrap();

    let mut auth = AuthContext::new(provider);
    auth.initialize(Some(session.clone())).await;

    assert!(!auth.is_loading());
    assert_eq!(auth.user().unwrap().name, "Alice");
    assert_eq!(auth.session(), Some(&session));
}

#[actix_rt::test]
async fn test_initialize_discards_bad_sessions() {
    let mut auth = AuthContext::new(provider_with_alice());

    let expired = Session {
        access_token: "irrelevant".to_string(),
        token_type: "bearer".to_string(),
        expires_at: (Utc::now() - Duration::minutes(5)).timestamp(),
        user_id: Uuid::new_v4(),
    };
    auth.initialize(Some(expired)).await;
    assert!(!auth.is_authenticated());

    let forged = SessionKeys::new("someone-elses-secret", Duration::hours(1))
        .issue(Uuid::new_v4())
        .unwrap();
    auth.initialize(Some(forged)).await;
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading());
    assert_eq!(auth.error(), "");
}
