//! Authentication state for the Animal Spotter service.
//!
//! This module provides:
//! - `Credentials`: username/password pair posted to the account endpoints
//! - `Session`: holder for the bearer token issued by a successful login
//!
//! Nothing here touches disk. Tokens live for the lifetime of the `Session`
//! and are dropped on `clear` or process exit.

pub mod credentials;
pub mod session;

pub use credentials::Credentials;
pub use session::{Session, SessionToken};
