//! Core library for the Animal Spotter service.
//!
//! Everything a front end needs to talk to the sighting API: the
//! session-holding `ApiClient`, its typed `ApiError`, the `Animal` model,
//! configuration, and a few display helpers.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{Credentials, Session, SessionToken};
pub use config::Config;
pub use models::{Animal, AnimalImage};
