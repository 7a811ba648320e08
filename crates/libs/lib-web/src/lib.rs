//! # Web Library
//!
//! HTTP surface of the swap engine: handlers, middleware, the swap services and
//! server startup.

pub mod handlers;
pub mod middleware;
pub mod services;
pub mod server;
pub mod wallet;

pub use server::{create_router, start_server, AppState, ServerConfig};
