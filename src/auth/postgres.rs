use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    auth::{
        password::{hash_password, verify_password, DEFAULT_COST},
        provider::IdentityProvider,
        token::{Session, SessionKeys},
    },
    config::Config,
    error::AppError,
    models::AuthUser,
};

const INVALID_CREDENTIALS: &str = "Invalid login credentials";
const ALREADY_REGISTERED: &str = "User already registered";
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, FromRow)]
struct AuthUserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    user_metadata: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
}

impl From<AuthUserRow> for AuthUser {
    fn from(row: AuthUserRow) -> Self {
        AuthUser {
            id: row.id,
            email: Some(row.email),
            user_metadata: row.user_metadata.0,
            created_at: Some(row.created_at),
        }
    }
}

/// Identity provider backed by the `auth_users` table
/// (see `migrations/0001_create_auth_users.sql`).
pub struct PgIdentityProvider {
    pool: PgPool,
    keys: SessionKeys,
    bcrypt_cost: u32,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool, keys: SessionKeys) -> Self {
        Self {
            pool,
            keys,
            bcrypt_cost: DEFAULT_COST,
        }
    }

    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let pool = PgPool::connect(&config.database_url).await?;
        Ok(Self::new(pool, SessionKeys::from_config(config)))
    }

    /// Lower costs are only meant for tests.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUserRow>, AppError> {
        let row = sqlx::query_as::<_, AuthUserRow>(
            "SELECT id, email, password_hash, user_metadata, created_at
             FROM auth_users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

fn signup_error(error: sqlx::Error) -> AppError {
    let duplicate = error
        .as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION);
    if duplicate {
        debug!("signup lost the race on the email unique index");
        AppError::BadRequest(ALREADY_REGISTERED.into())
    } else {
        error.into()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthUser, Session), AppError> {
        let email = normalize_email(email);
        let row = match self.find_by_email(&email).await? {
            Some(row) => row,
            None => {
                debug!("sign-in attempt for unknown email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        if !verify_password(password, &row.password_hash)? {
            warn!("rejected password for user {}", row.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let session = self.keys.issue(row.id)?;
        info!("user {} signed in", row.id);
        Ok((row.into(), session))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        user_metadata: Map<String, Value>,
    ) -> Result<(AuthUser, Session), AppError> {
        let email = normalize_email(email);
        // Fast path only; a concurrent signup is caught by the unique index below.
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest(ALREADY_REGISTERED.into()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        let row = sqlx::query_as::<_, AuthUserRow>(
            "INSERT INTO auth_users (id, email, password_hash, user_metadata)
             VALUES ($1, $2, $3, $4)
             RETURNING id, email, password_hash, user_metadata, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(password_hash)
        .bind(Json(user_metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(signup_error)?;

        let session = self.keys.issue(row.id)?;
        info!("user {} signed up", row.id);
        Ok((row.into(), session))
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AppError> {
        // Tokens are stateless; an invalid one still counts as signed out.
        match self.keys.verify(&session.access_token) {
            Ok(claims) => info!("user {} signed out", claims.sub),
            Err(e) => debug!("sign-out with unusable session: {}", e),
        }
        Ok(())
    }

    async fn user_for_session(&self, access_token: &str) -> Result<AuthUser, AppError> {
        let claims = self.keys.verify(access_token)?;
        let row = sqlx::query_as::<_, AuthUserRow>(
            "SELECT id, email, password_hash, user_metadata, created_at
             FROM auth_users WHERE id = $1",
        )
        .bind(claims.sub)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AuthUser::from)
            .ok_or_else(|| AppError::Unauthorized("User not found".into()))
    }

    async fn update_user_metadata(
        &self,
        session: &Session,
        user_metadata: Map<String, Value>,
    ) -> Result<AuthUser, AppError> {
        let claims = self.keys.verify(&session.access_token)?;
        let row = sqlx::query_as::<_, AuthUserRow>(
            "UPDATE auth_users SET user_metadata = user_metadata || $1
             WHERE id = $2
             RETURNING id, email, password_hash, user_metadata, created_at",
        )
        .bind(Json(user_metadata))
        .bind(claims.sub)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AuthUser::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
