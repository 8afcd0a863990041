#![doc = "The `taskmarket` library crate."]
#![doc = ""]
#![doc = "Shared record types for tasks, transactions and users, the client-side auth"]
#![doc = "context with its identity provider seam, the age and user-metadata helpers, and"]
#![doc = "the presentational components used by the auth pages."]

pub mod auth;
pub mod components;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use crate::error::AppError;
pub use crate::utils::{format_user_with_metadata, validate_age};
