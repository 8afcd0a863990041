use std::env;

use crate::error::AppError;

const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Settings for the Postgres-backed identity provider.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw.parse::<i64>().ok().filter(|hours| *hours > 0).ok_or_else(|| {
                AppError::InternalServerError(
                    "SESSION_TTL_HOURS must be a positive number".into(),
                )
            })?,
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            session_ttl_hours,
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::InternalServerError(format!("{} must be set", key)))
}
