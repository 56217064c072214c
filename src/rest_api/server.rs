//! # REST API Router
//!
//! Wires the `/api` endpoints to their handlers over a shared store.

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::store::LessonStore;

use super::handler::{
    create_section_handler, create_super_lesson_handler, delete_exercise_handler,
    delete_lesson_handler, delete_section_handler, delete_super_lesson_handler,
    tree_handler, update_exercise_handler, update_lesson_handler, update_section_handler,
    update_super_lesson_handler,
};

/// REST API over a [`LessonStore`]
pub struct RestServer<S: LessonStore> {
    store: Arc<S>,
}

impl<S: LessonStore + 'static> RestServer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/data", get(tree_handler::<S>))
            .route("/api/super-lessons", post(create_super_lesson_handler::<S>))
            .route(
                "/api/super-lessons/:id",
                patch(update_super_lesson_handler::<S>).delete(delete_super_lesson_handler::<S>),
            )
            .route("/api/sections", post(create_section_handler::<S>))
            .route(
                "/api/sections/:id",
                patch(update_section_handler::<S>).delete(delete_section_handler::<S>),
            )
            .route(
                "/api/lessons/:lesson_id",
                delete(delete_lesson_handler::<S>).patch(update_lesson_handler::<S>),
            )
            .route(
                "/api/exercises/:exercise_id",
                delete(delete_exercise_handler::<S>).patch(update_exercise_handler::<S>),
            )
            .with_state(self.store)
    }
}
