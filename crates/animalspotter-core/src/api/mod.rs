//! REST API client module for the Animal Spotter service.
//!
//! This module provides the `ApiClient` for creating accounts, logging in,
//! and fetching animal names, sighting details and pictures.
//!
//! The animal endpoints use bearer token authentication; the token comes
//! from `POST /users/login` and does not expire.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
