pub mod context;
pub mod password;
pub mod postgres;
pub mod provider;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{error::AppError, utils::validate_age};

pub use context::AuthContext;
pub use postgres::PgIdentityProvider;
pub use provider::IdentityProvider;
pub use token::{Claims, Session, SessionKeys};

lazy_static! {
    // Letters from any script, plus spaces, apostrophes, hyphens and dots between them.
    static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^\p{L}[\p{L} '.\-]*$").unwrap();
}

/// Credentials submitted by the login form.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// What the identity provider needs to create an account.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        regex(path = "NAME_REGEX", message = "Name may only contain letters, spaces, apostrophes, hyphens or dots")
    )]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Everything the signup form collects, before it is reduced to a [`SignupRequest`].
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        regex(path = "NAME_REGEX", message = "Name may only contain letters, spaces, apostrophes, hyphens or dots")
    )]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(custom = "validate_adult")]
    pub date_of_birth: String,
    #[serde(default)]
    pub agreed_to_terms: bool,
}

impl SignupForm {
    /// Runs field validation and the terms check.
    pub fn into_request(self) -> Result<SignupRequest, AppError> {
        self.validate()?;
        if !self.agreed_to_terms {
            return Err(AppError::BadRequest(
                "You must agree to the Terms of Service and Privacy Policy".into(),
            ));
        }
        Ok(SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email,
            password: self.password,
        })
    }
}

fn validate_adult(date_of_birth: &str) -> Result<(), ValidationError> {
    if validate_age(Some(date_of_birth)) {
        Ok(())
    } else {
        let mut error = ValidationError::new("underage");
        error.message = Some("You must be at least 18 years old to sign up".into());
        Err(error)
    }
}
