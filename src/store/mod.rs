//! # Lesson Store
//!
//! Row source for the lesson tree and the mutation statements.
//!
//! Two implementations share the [`LessonStore`] contract:
//!
//! - [`PgLessonStore`]: PostgreSQL through a bounded `sqlx` pool
//! - [`MemoryLessonStore`]: in-process tables with the same join ordering
//!   and all-or-nothing multi-statement writes
//!
//! Multi-statement writes (lesson delete, exercise delete, exercise update)
//! either commit every statement or none.

mod config;
mod errors;
pub mod fault_point;
mod memory;
mod postgres;
mod records;

use std::future::Future;
use std::pin::Pin;

pub use config::DatabaseConfig;
pub use errors::{StoreError, StoreResult};
pub use fault_point::FaultInjector;
pub use memory::MemoryLessonStore;
pub use postgres::{PgLessonStore, TREE_QUERY};
pub use records::{
    DataWrite, ExercisePatch, LessonPatch, LessonRecord, NewSection, NewSuperLesson,
    SectionPatch, SectionRecord, SuperLessonPatch, SuperLessonRecord,
};

use crate::tree::TreeRow;

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Data access used by the REST layer
pub trait LessonStore: Send + Sync {
    /// Flat rows of the aggregate join, ordered by super-lesson id, section
    /// position (nulls last), section id, lesson id, exercise id.
    fn fetch_tree_rows(&self) -> StoreFuture<'_, Vec<TreeRow>>;

    fn create_super_lesson(&self, new: NewSuperLesson) -> StoreFuture<'_, SuperLessonRecord>;

    /// `None` when no super-lesson has this id.
    fn update_super_lesson(
        &self,
        id: i64,
        patch: SuperLessonPatch,
    ) -> StoreFuture<'_, Option<SuperLessonRecord>>;

    /// Returns the number of rows deleted.
    fn delete_super_lesson(&self, id: i64) -> StoreFuture<'_, u64>;

    fn create_section(&self, new: NewSection) -> StoreFuture<'_, SectionRecord>;

    /// `None` when no section has this id.
    fn update_section(&self, id: i64, patch: SectionPatch)
        -> StoreFuture<'_, Option<SectionRecord>>;

    /// Returns the number of rows deleted.
    fn delete_section(&self, id: i64) -> StoreFuture<'_, u64>;

    /// Delete a lesson and its exercises atomically. `false` when the lesson
    /// does not exist (nothing is changed).
    fn delete_lesson(&self, id: i64) -> StoreFuture<'_, bool>;

    /// `None` when no lesson has this id.
    fn update_lesson(&self, id: i64, patch: LessonPatch) -> StoreFuture<'_, Option<LessonRecord>>;

    /// Delete an exercise and its data row atomically. `false` when the
    /// exercise does not exist (nothing is changed).
    fn delete_exercise(&self, id: i64) -> StoreFuture<'_, bool>;

    /// Update the exercise row and upsert its data row in one transaction.
    fn update_exercise(&self, id: i64, patch: ExercisePatch) -> StoreFuture<'_, DataWrite>;
}
