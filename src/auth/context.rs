//! Client-side auth state.
//!
//! [`AuthContext`] owns the current user and session and is the only thing
//! that talks to the [`IdentityProvider`]. Forms call its operations and read
//! [`AuthContext::error`] to feed the error banner.

use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    auth::{provider::IdentityProvider, token::Session, LoginRequest, SignupRequest},
    error::AppError,
    models::CustomUser,
    utils::format_user_with_metadata,
};

pub struct AuthContext<P> {
    provider: P,
    user: Option<CustomUser>,
    session: Option<Session>,
    is_loading: bool,
    error: String,
}

impl<P: IdentityProvider> AuthContext<P> {
    /// Starts in the loading state until [`AuthContext::initialize`] runs.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            user: None,
            session: None,
            is_loading: true,
            error: String::new(),
        }
    }

    pub fn user(&self) -> Option<&CustomUser> {
        self.user.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.session.is_some()
    }

    /// Message of the last failed operation, or `""`.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn clear_error(&mut self) {
        self.error.clear();
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Restores a previously stored session.
    ///
    /// An expired or rejected session leaves the context signed out; that is
    /// not reported as an error.
    pub async fn initialize(&mut self, stored: Option<Session>) {
        self.is_loading = true;
        match stored {
            Some(session) if !session.is_expired() => {
                let restored = self.provider.user_for_session(&session.access_token).await;
                match restored {
                    Ok(user) => {
                        debug!("restored session for user {}", user.id);
                        self.user = Some(format_user_with_metadata(user));
                        self.session = Some(session);
                    }
                    Err(e) => {
                        warn!("discarding stored session: {}", e);
                        self.user = None;
                        self.session = None;
                    }
                }
            }
            Some(_) => {
                debug!("stored session has expired");
                self.user = None;
                self.session = None;
            }
            None => {}
        }
        self.is_loading = false;
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.begin();
        let result = match request.validate() {
            Ok(()) => {
                self.provider
                    .sign_in_with_password(&request.email, &request.password)
                    .await
            }
            Err(e) => Err(e.into()),
        };
        let outcome = result.map(|(user, session)| {
            self.user = Some(format_user_with_metadata(user));
            self.session = Some(session);
        });
        self.finish(outcome)
    }

    /// Creates the account with `name` and zero experience in its metadata.
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<CustomUser, AppError> {
        let request = SignupRequest {
            name: name.trim().to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.begin();
        let result = match request.validate() {
            Ok(()) => {
                let mut metadata = Map::new();
                metadata.insert("name".to_string(), Value::from(request.name.clone()));
                metadata.insert("experience".to_string(), Value::from(0));
                self.provider
                    .sign_up(&request.email, &request.password, metadata)
                    .await
            }
            Err(e) => Err(e.into()),
        };
        let outcome = result.map(|(user, session)| {
            let user = format_user_with_metadata(user);
            info!("signed up user {}", user.id());
            self.user = Some(user.clone());
            self.session = Some(session);
            user
        });
        self.finish(outcome)
    }

    /// Local state is cleared even if the provider fails to end the session.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        self.begin();
        let result = match self.session.take() {
            Some(session) => self.provider.sign_out(&session).await,
            None => Ok(()),
        };
        self.user = None;
        self.finish(result)
    }

    /// Adds `hours` to the user's experience, never going below zero.
    pub async fn update_experience(&mut self, hours: f64) -> Result<(), AppError> {
        let signed_in = self
            .session
            .clone()
            .zip(self.user.as_ref().map(|user| user.experience));
        let Some((session, current)) = signed_in else {
            return self.finish(Err(AppError::Unauthorized(
                "You must be signed in to update experience".into(),
            )));
        };
        let total = current + hours;
        if !total.is_finite() {
            return self.finish(Err(AppError::BadRequest(
                "Experience hours are out of range".into(),
            )));
        }

        self.begin();
        let experience = total.max(0.0);
        let mut metadata = Map::new();
        metadata.insert("experience".to_string(), Value::from(experience));

        let result = self.provider.update_user_metadata(&session, metadata).await;
        let outcome = result.map(|user| {
            debug!("experience for user {} is now {}", user.id, experience);
            self.user = Some(format_user_with_metadata(user));
        });
        self.finish(outcome)
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error.clear();
    }

    fn finish<T>(&mut self, result: Result<T, AppError>) -> Result<T, AppError> {
        self.is_loading = false;
        if let Err(e) = &result {
            if e.is_internal() {
                error!("auth operation failed: {}", e);
            } else {
                debug!("auth operation failed: {}", e);
            }
            self.error = e.message().to_string();
        }
        result
    }
}
