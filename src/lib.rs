//! hyperlekce - lesson-content tree service
//!
//! Serves a super-lesson → section → lesson → exercise tree stored in
//! PostgreSQL. The aggregate read flattens the hierarchy with one LEFT JOIN
//! query and [`tree::build_tree`] folds the rows back into nested nodes.

pub mod cli;
pub mod http_server;
pub mod ids;
pub mod observability;
pub mod rest_api;
pub mod store;
pub mod tree;
