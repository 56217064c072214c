//! # REST API Handlers
//!
//! One axum handler per endpoint. Handlers validate the body, make a single
//! store call, and map the outcome to a status code.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::store::{LessonRecord, LessonStore, SectionRecord, SuperLessonRecord};
use crate::tree::{build_tree, SuperLessonNode};

use super::errors::{ApiError, ApiResult};
use super::request::{
    CreateSectionRequest, CreateSuperLessonRequest, UpdateExerciseRequest, UpdateLessonRequest,
    UpdateSectionRequest, UpdateSuperLessonRequest,
};
use super::response::{MessageResponse, StatusResponse};

/// Shared state type
pub type StoreState<S> = Arc<S>;

// ==================
// Aggregate read
// ==================

/// `GET /api/data`
pub async fn tree_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
) -> ApiResult<Json<Vec<SuperLessonNode>>> {
    let rows = store
        .fetch_tree_rows()
        .await
        .map_err(ApiError::data_source("loading data"))?;

    let row_count = rows.len();
    let tree = build_tree(rows);
    debug!(rows = row_count, super_lessons = tree.len(), "Built lesson tree");

    Ok(Json(tree))
}

// ==================
// Super lessons
// ==================

pub async fn create_super_lesson_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Json(body): Json<CreateSuperLessonRequest>,
) -> ApiResult<(StatusCode, Json<SuperLessonRecord>)> {
    let new = body.validate()?;
    let record = store
        .create_super_lesson(new)
        .await
        .map_err(ApiError::data_source("creating super lesson"))?;

    info!(id = record.id, "Created super lesson");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_super_lesson_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSuperLessonRequest>,
) -> ApiResult<Json<SuperLessonRecord>> {
    store
        .update_super_lesson(id, body.into_patch())
        .await
        .map_err(ApiError::data_source("updating super lesson"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn delete_super_lesson_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<StatusResponse>> {
    let deleted = store
        .delete_super_lesson(id)
        .await
        .map_err(ApiError::data_source("deleting super lesson"))?;

    info!(id, deleted, "Deleted super lesson");
    Ok(Json(StatusResponse::ok()))
}

// ==================
// Sections
// ==================

pub async fn create_section_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Json(body): Json<CreateSectionRequest>,
) -> ApiResult<(StatusCode, Json<SectionRecord>)> {
    let new = body.validate()?;
    let super_lesson_id = new.super_lesson_id;
    let record = store
        .create_section(new)
        .await
        .map_err(ApiError::data_source("creating section"))?;

    info!(id = record.id, super_lesson_id, "Created section");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_section_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSectionRequest>,
) -> ApiResult<Json<SectionRecord>> {
    store
        .update_section(id, body.into_patch())
        .await
        .map_err(ApiError::data_source("updating section"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn delete_section_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<StatusResponse>> {
    let deleted = store
        .delete_section(id)
        .await
        .map_err(ApiError::data_source("deleting section"))?;

    info!(id, deleted, "Deleted section");
    Ok(Json(StatusResponse::ok()))
}

// ==================
// Lessons
// ==================

pub async fn delete_lesson_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Path(lesson_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = store
        .delete_lesson(lesson_id)
        .await
        .map_err(ApiError::data_source("deleting lesson"))?;

    if !deleted {
        return Err(ApiError::NotFound);
    }
    info!(lesson_id, "Deleted lesson with its exercises");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_lesson_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Path(lesson_id): Path<i64>,
    Json(body): Json<UpdateLessonRequest>,
) -> ApiResult<Json<LessonRecord>> {
    let patch = body.validate()?;
    store
        .update_lesson(lesson_id, patch)
        .await
        .map_err(ApiError::data_source("updating lesson"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// ==================
// Exercises
// ==================

pub async fn delete_exercise_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Path(exercise_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = store
        .delete_exercise(exercise_id)
        .await
        .map_err(ApiError::data_source("deleting exercise"))?;

    if !deleted {
        return Err(ApiError::NotFound);
    }
    info!(exercise_id, "Deleted exercise with its data");
    Ok(StatusCode::NO_CONTENT)
}

/// Answers with a confirmation message only, not the updated row.
pub async fn update_exercise_handler<S: LessonStore + 'static>(
    State(store): State<StoreState<S>>,
    Path(exercise_id): Path<i64>,
    Json(body): Json<UpdateExerciseRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let patch = body.validate()?;
    let write = store
        .update_exercise(exercise_id, patch)
        .await
        .map_err(ApiError::data_source("updating exercise"))?;

    info!(exercise_id, data = ?write, "Updated exercise");
    Ok(Json(MessageResponse::new("Exercise updated")))
}
