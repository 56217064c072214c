//! Transaction Rollback Tests
//!
//! Multi-statement writes either commit every statement or none. A fault
//! point armed between two statements must leave the store exactly as it
//! was before the request.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use hyperlekce::rest_api::RestServer;
use hyperlekce::store::fault_point::points;
use hyperlekce::store::{
    ExercisePatch, LessonStore, MemoryLessonStore, NewSection, NewSuperLesson, StoreError,
};
use hyperlekce::tree::build_tree;
use serde_json::json;
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

/// Store with one lesson holding two exercises; the first has a data row.
async fn seeded() -> (Arc<MemoryLessonStore>, i64, i64, i64) {
    let store = Arc::new(MemoryLessonStore::new());
    let sl = store
        .create_super_lesson(NewSuperLesson {
            title: "Algebra".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let section = store
        .create_section(NewSection {
            super_lesson_id: sl.id,
            title: "Rovnice".to_string(),
            position: Some(1),
        })
        .await
        .unwrap();
    let lesson = store.insert_lesson(section.id, Some("Lineární")).unwrap();
    let first = store.insert_exercise(lesson, "input", "x + 1 = 2").unwrap();
    let second = store.insert_exercise(lesson, "input", "x - 1 = 2").unwrap();
    store.insert_exercise_data(first, "{\"answer\":1}").unwrap();

    (store, lesson, first, second)
}

async fn tree_json(store: &MemoryLessonStore) -> serde_json::Value {
    serde_json::to_value(build_tree(store.fetch_tree_rows().await.unwrap())).unwrap()
}

async fn request(store: &Arc<MemoryLessonStore>, method: Method, uri: &str, body: Option<serde_json::Value>) -> StatusCode {
    let router = RestServer::new(Arc::clone(store)).router();
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    router.oneshot(builder.body(body).unwrap()).await.unwrap().status()
}

// =============================================================================
// Lesson delete
// =============================================================================

#[tokio::test]
async fn test_lesson_delete_fault_keeps_lesson_and_exercises() {
    let (store, lesson, first, second) = seeded().await;
    let before = tree_json(&store).await;

    store.faults().arm(points::LESSON_AFTER_EXERCISES_DELETE);
    let status = request(&store, Method::DELETE, &format!("/api/lessons/{}", lesson), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(store.lesson(lesson).is_some());
    assert!(store.exercise_exists(first));
    assert!(store.exercise_exists(second));
    assert_eq!(store.exercise_data(first).len(), 1);
    assert_eq!(tree_json(&store).await, before);
}

#[tokio::test]
async fn test_lesson_delete_succeeds_after_disarm() {
    let (store, lesson, first, _) = seeded().await;

    store.faults().arm(points::LESSON_AFTER_EXERCISES_DELETE);
    assert!(store.delete_lesson(lesson).await.is_err());

    store.faults().disarm();
    assert!(store.delete_lesson(lesson).await.unwrap());
    assert!(store.lesson(lesson).is_none());
    assert_eq!(store.exercise_count(lesson), 0);
    assert!(store.exercise_data(first).is_empty());
}

#[tokio::test]
async fn test_missing_lesson_delete_changes_nothing() {
    let (store, lesson, _, _) = seeded().await;
    let before = tree_json(&store).await;

    let status = request(&store, Method::DELETE, "/api/lessons/424242", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(store.lesson(lesson).is_some());
    assert_eq!(tree_json(&store).await, before);
}

// =============================================================================
// Exercise delete
// =============================================================================

#[tokio::test]
async fn test_exercise_delete_fault_keeps_data_row() {
    let (store, _, first, _) = seeded().await;
    let before = tree_json(&store).await;

    store.faults().arm(points::EXERCISE_AFTER_DATA_DELETE);
    let status = request(&store, Method::DELETE, &format!("/api/exercises/{}", first), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(store.exercise_exists(first));
    assert_eq!(store.exercise_data(first), vec![Some("{\"answer\":1}".to_string())]);
    assert_eq!(tree_json(&store).await, before);
}

// =============================================================================
// Exercise update
// =============================================================================

#[tokio::test]
async fn test_exercise_update_fault_keeps_row_and_data() {
    let (store, _, first, _) = seeded().await;
    let before = tree_json(&store).await;

    store.faults().arm(points::EXERCISE_AFTER_ROW_UPDATE);
    let status = request(
        &store,
        Method::PATCH,
        &format!("/api/exercises/{}", first),
        Some(json!({"question": "changed", "data_content": "changed"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        store.exercise_fields(first),
        Some((Some("input".to_string()), Some("x + 1 = 2".to_string())))
    );
    assert_eq!(store.exercise_data(first), vec![Some("{\"answer\":1}".to_string())]);
    assert_eq!(tree_json(&store).await, before);
}

#[tokio::test]
async fn test_exercise_update_fault_does_not_insert_data() {
    let (store, _, _, second) = seeded().await;

    store.faults().arm(points::EXERCISE_AFTER_ROW_UPDATE);
    let err = store
        .update_exercise(
            second,
            ExercisePatch {
                kind: None,
                question: None,
                data_content: Some("{}".to_string()),
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_injected());
    assert!(store.exercise_data(second).is_empty());
}

#[tokio::test]
async fn test_exercise_update_for_missing_exercise_fails_cleanly() {
    let (store, _, _, _) = seeded().await;
    let before = tree_json(&store).await;

    let err = store
        .update_exercise(
            999_999,
            ExercisePatch {
                kind: Some("choice".to_string()),
                question: None,
                data_content: Some("{}".to_string()),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Constraint(_)));
    assert_eq!(tree_json(&store).await, before);
}
