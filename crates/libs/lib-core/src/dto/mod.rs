//! # Data Transfer Objects (DTOs)
//!
//! Request and response bodies of the REST API.

pub mod auth;

pub use auth::*;
