//! # HTTP Server Module
//!
//! Combines all endpoint routers into one Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/*` - Lesson tree and mutations
//! - anything else - static front-end files

pub mod config;
pub mod health;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
