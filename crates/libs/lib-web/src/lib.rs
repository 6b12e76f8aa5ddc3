//! # Web Library
//!
//! HTTP handlers, middleware, routes, and server start-up for the auth service.

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{create_router, start_server, AppState, ServerConfig};
