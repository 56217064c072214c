//! # REST API Module
//!
//! HTTP endpoints for the lesson tree: one aggregate read (`GET /api/data`)
//! and the create/update/delete endpoints for each level.

pub mod errors;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use response::{MessageResponse, StatusResponse};
pub use server::RestServer;
