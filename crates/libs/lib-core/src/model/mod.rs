//! # Model Layer
//!
//! Persistence for users and their credentials.

pub mod store;
