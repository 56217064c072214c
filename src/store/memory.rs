//! In-memory store
//!
//! Keeps the five tables in ordered maps behind a `RwLock`. The tree rows
//! are produced by walking the maps the way the LEFT JOIN would, in the
//! aggregate query's order. Foreign keys behave like plain (non-cascading)
//! PostgreSQL references.
//!
//! Multi-statement writes run against a scratch copy of the tables that
//! replaces the live copy only after the last statement succeeds.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::errors::{StoreError, StoreResult};
use super::fault_point::{points, FaultInjector};
use super::records::{
    DataWrite, ExercisePatch, LessonPatch, LessonRecord, NewSection, NewSuperLesson,
    SectionPatch, SectionRecord, SuperLessonPatch, SuperLessonRecord,
};
use super::{LessonStore, StoreFuture};
use crate::tree::TreeRow;

#[derive(Debug, Clone)]
struct SuperLessonRow {
    title: String,
    description: Option<String>,
}

#[derive(Debug, Clone)]
struct SectionRow {
    super_lesson_id: i64,
    title: String,
    position: Option<i32>,
}

#[derive(Debug, Clone)]
struct ExerciseRow {
    lesson_id: i64,
    kind: Option<String>,
    question: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ExerciseDataRow {
    exercise_id: i64,
    data: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    super_lessons: BTreeMap<i64, SuperLessonRow>,
    sections: BTreeMap<i64, SectionRow>,
    lessons: BTreeMap<i64, LessonRecord>,
    exercises: BTreeMap<i64, ExerciseRow>,
    exercise_data: BTreeMap<i64, ExerciseDataRow>,
    sequence: i64,
}

impl Tables {
    /// Ids come from one shared sequence, so they never collide across tables
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn join_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();

        for (&super_id, sl) in &self.super_lessons {
            let base = TreeRow {
                super_id,
                super_title: Some(sl.title.clone()),
                super_description: sl.description.clone(),
                ..Default::default()
            };

            let mut sections: Vec<(i64, &SectionRow)> = self
                .sections
                .iter()
                .filter(|(_, s)| s.super_lesson_id == super_id)
                .map(|(&id, s)| (id, s))
                .collect();
            // position ASC NULLS LAST, id ASC
            sections.sort_by_key(|(id, s)| (s.position.is_none(), s.position, *id));

            if sections.is_empty() {
                rows.push(base);
                continue;
            }

            for (section_id, section) in sections {
                let section_row = TreeRow {
                    section_id: Some(section_id),
                    section_title: Some(section.title.clone()),
                    section_position: section.position,
                    ..base.clone()
                };
                self.push_lesson_rows(section_id, section_row, &mut rows);
            }
        }

        rows
    }

    fn push_lesson_rows(&self, section_id: i64, section_row: TreeRow, rows: &mut Vec<TreeRow>) {
        let mut any = false;
        for lesson in self.lessons.values().filter(|l| l.section_id == section_id) {
            any = true;
            let lesson_row = TreeRow {
                lesson_id: Some(lesson.id),
                lesson_title: lesson.title.clone(),
                lesson_intro: lesson.intro.clone(),
                lesson_before_exercise: lesson.before_exercise.clone(),
                lesson_outro: lesson.outro.clone(),
                lesson_section_id: Some(lesson.section_id),
                lesson_created_at: lesson.created_at,
                lesson_updated_at: lesson.updated_at,
                ..section_row.clone()
            };
            self.push_exercise_rows(lesson.id, lesson_row, rows);
        }
        if !any {
            rows.push(section_row);
        }
    }

    fn push_exercise_rows(&self, lesson_id: i64, lesson_row: TreeRow, rows: &mut Vec<TreeRow>) {
        let mut any = false;
        let exercises = self
            .exercises
            .iter()
            .filter(|(_, e)| e.lesson_id == lesson_id);
        for (&exercise_id, exercise) in exercises {
            any = true;
            let exercise_row = TreeRow {
                exercise_id: Some(exercise_id),
                exercise_lesson_id: Some(exercise.lesson_id),
                exercise_type: exercise.kind.clone(),
                exercise_question: exercise.question.clone(),
                exercise_created_at: Some(exercise.created_at),
                ..lesson_row.clone()
            };

            // one joined row per data row; no data row still yields one row
            let mut data_rows = self
                .exercise_data
                .iter()
                .filter(|(_, d)| d.exercise_id == exercise_id)
                .peekable();
            if data_rows.peek().is_none() {
                rows.push(exercise_row);
                continue;
            }
            for (&data_id, data) in data_rows {
                rows.push(TreeRow {
                    data_id: Some(data_id),
                    data: data.data.clone(),
                    ..exercise_row.clone()
                });
            }
        }
        if !any {
            rows.push(lesson_row);
        }
    }
}

/// In-process [`LessonStore`] for tests and database-less runs
#[derive(Debug, Default)]
pub struct MemoryLessonStore {
    tables: RwLock<Tables>,
    faults: FaultInjector,
}

impl MemoryLessonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` on a scratch copy and keep the result only if `f` succeeds.
    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> StoreResult<Option<T>>,
    ) -> StoreResult<Option<T>> {
        let mut live = self.write();
        let mut scratch = live.clone();
        match f(&mut scratch)? {
            Some(value) => {
                *live = scratch;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    // ==================
    // Seeding (lessons, exercises and data have no create endpoint)
    // ==================

    pub fn insert_lesson(&self, section_id: i64, title: Option<&str>) -> StoreResult<i64> {
        let mut tables = self.write();
        if !tables.sections.contains_key(&section_id) {
            return Err(StoreError::constraint(format!(
                "lessons.section_id {} references no section",
                section_id
            )));
        }
        let id = tables.next_id();
        let now = Utc::now();
        tables.lessons.insert(
            id,
            LessonRecord {
                id,
                title: title.map(str::to_string),
                intro: None,
                before_exercise: None,
                outro: None,
                section_id,
                created_at: Some(now),
                updated_at: Some(now),
            },
        );
        Ok(id)
    }

    pub fn insert_exercise(&self, lesson_id: i64, kind: &str, question: &str) -> StoreResult<i64> {
        let mut tables = self.write();
        if !tables.lessons.contains_key(&lesson_id) {
            return Err(StoreError::constraint(format!(
                "exercises.lesson_id {} references no lesson",
                lesson_id
            )));
        }
        let id = tables.next_id();
        tables.exercises.insert(
            id,
            ExerciseRow {
                lesson_id,
                kind: Some(kind.to_string()),
                question: Some(question.to_string()),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    pub fn insert_exercise_data(&self, exercise_id: i64, data: &str) -> StoreResult<i64> {
        let mut tables = self.write();
        insert_data_row(&mut tables, exercise_id, data)
    }

    // ==================
    // Inspection
    // ==================

    pub fn lesson(&self, id: i64) -> Option<LessonRecord> {
        self.read().lessons.get(&id).cloned()
    }

    pub fn exercise_exists(&self, id: i64) -> bool {
        self.read().exercises.contains_key(&id)
    }

    /// `(type, question)` of an exercise
    pub fn exercise_fields(&self, id: i64) -> Option<(Option<String>, Option<String>)> {
        self.read()
            .exercises
            .get(&id)
            .map(|e| (e.kind.clone(), e.question.clone()))
    }

    /// Data payloads stored for an exercise, in data-row id order.
    pub fn exercise_data(&self, exercise_id: i64) -> Vec<Option<String>> {
        self.read()
            .exercise_data
            .values()
            .filter(|d| d.exercise_id == exercise_id)
            .map(|d| d.data.clone())
            .collect()
    }

    pub fn exercise_count(&self, lesson_id: i64) -> usize {
        self.read()
            .exercises
            .values()
            .filter(|e| e.lesson_id == lesson_id)
            .count()
    }
}

fn insert_data_row(tables: &mut Tables, exercise_id: i64, data: &str) -> StoreResult<i64> {
    if !tables.exercises.contains_key(&exercise_id) {
        return Err(StoreError::constraint(format!(
            "exercise_data.exercise_id {} references no exercise",
            exercise_id
        )));
    }
    let id = tables.next_id();
    tables.exercise_data.insert(
        id,
        ExerciseDataRow {
            exercise_id,
            data: Some(data.to_string()),
        },
    );
    Ok(id)
}

impl LessonStore for MemoryLessonStore {
    fn fetch_tree_rows(&self) -> StoreFuture<'_, Vec<TreeRow>> {
        Box::pin(async move { Ok(self.read().join_rows()) })
    }

    fn create_super_lesson(&self, new: NewSuperLesson) -> StoreFuture<'_, SuperLessonRecord> {
        Box::pin(async move {
            let mut tables = self.write();
            let id = tables.next_id();
            tables.super_lessons.insert(
                id,
                SuperLessonRow {
                    title: new.title.clone(),
                    description: new.description.clone(),
                },
            );
            Ok(SuperLessonRecord {
                id,
                title: Some(new.title),
                description: new.description,
            })
        })
    }

    fn update_super_lesson(
        &self,
        id: i64,
        patch: SuperLessonPatch,
    ) -> StoreFuture<'_, Option<SuperLessonRecord>> {
        Box::pin(async move {
            let mut tables = self.write();
            let Some(row) = tables.super_lessons.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(title) = patch.title {
                row.title = title;
            }
            if let Some(description) = patch.description {
                row.description = description;
            }
            Ok(Some(SuperLessonRecord {
                id,
                title: Some(row.title.clone()),
                description: row.description.clone(),
            }))
        })
    }

    fn delete_super_lesson(&self, id: i64) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let mut tables = self.write();
            if tables.sections.values().any(|s| s.super_lesson_id == id) {
                return Err(StoreError::constraint(format!(
                    "superLessons {} is still referenced from sections",
                    id
                )));
            }
            Ok(u64::from(tables.super_lessons.remove(&id).is_some()))
        })
    }

    fn create_section(&self, new: NewSection) -> StoreFuture<'_, SectionRecord> {
        Box::pin(async move {
            let mut tables = self.write();
            if !tables.super_lessons.contains_key(&new.super_lesson_id) {
                return Err(StoreError::constraint(format!(
                    "sections.super_lesson_id {} references no super lesson",
                    new.super_lesson_id
                )));
            }
            let id = tables.next_id();
            tables.sections.insert(
                id,
                SectionRow {
                    super_lesson_id: new.super_lesson_id,
                    title: new.title.clone(),
                    position: new.position,
                },
            );
            Ok(SectionRecord {
                id,
                title: Some(new.title),
                position: new.position,
            })
        })
    }

    fn update_section(
        &self,
        id: i64,
        patch: SectionPatch,
    ) -> StoreFuture<'_, Option<SectionRecord>> {
        Box::pin(async move {
            let mut tables = self.write();
            let Some(row) = tables.sections.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(title) = patch.title {
                row.title = title;
            }
            if let Some(position) = patch.position {
                row.position = Some(position);
            }
            Ok(Some(SectionRecord {
                id,
                title: Some(row.title.clone()),
                position: row.position,
            }))
        })
    }

    fn delete_section(&self, id: i64) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let mut tables = self.write();
            if tables.lessons.values().any(|l| l.section_id == id) {
                return Err(StoreError::constraint(format!(
                    "sections {} is still referenced from lessons",
                    id
                )));
            }
            Ok(u64::from(tables.sections.remove(&id).is_some()))
        })
    }

    fn delete_lesson(&self, id: i64) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let deleted = self.transaction(|t| {
                let exercise_ids: Vec<i64> = t
                    .exercises
                    .iter()
                    .filter(|(_, e)| e.lesson_id == id)
                    .map(|(&eid, _)| eid)
                    .collect();
                t.exercise_data.retain(|_, d| !exercise_ids.contains(&d.exercise_id));
                t.exercises.retain(|_, e| e.lesson_id != id);

                self.faults.check(points::LESSON_AFTER_EXERCISES_DELETE)?;

                Ok(t.lessons.remove(&id).map(|_| ()))
            })?;
            Ok(deleted.is_some())
        })
    }

    fn update_lesson(&self, id: i64, patch: LessonPatch) -> StoreFuture<'_, Option<LessonRecord>> {
        Box::pin(async move {
            let mut tables = self.write();
            let Some(lesson) = tables.lessons.get_mut(&id) else {
                return Ok(None);
            };
            if patch.title.is_some() {
                lesson.title = patch.title;
            }
            if patch.intro.is_some() {
                lesson.intro = patch.intro;
            }
            if patch.before_exercise.is_some() {
                lesson.before_exercise = patch.before_exercise;
            }
            if patch.outro.is_some() {
                lesson.outro = patch.outro;
            }
            lesson.updated_at = Some(Utc::now());
            Ok(Some(lesson.clone()))
        })
    }

    fn delete_exercise(&self, id: i64) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let deleted = self.transaction(|t| {
                t.exercise_data.retain(|_, d| d.exercise_id != id);

                self.faults.check(points::EXERCISE_AFTER_DATA_DELETE)?;

                Ok(t.exercises.remove(&id).map(|_| ()))
            })?;
            Ok(deleted.is_some())
        })
    }

    fn update_exercise(&self, id: i64, patch: ExercisePatch) -> StoreFuture<'_, DataWrite> {
        Box::pin(async move {
            let write = self.transaction(|t| {
                if patch.touches_exercise_row() {
                    if let Some(exercise) = t.exercises.get_mut(&id) {
                        if let Some(kind) = &patch.kind {
                            exercise.kind = Some(kind.clone());
                        }
                        if let Some(question) = &patch.question {
                            exercise.question = Some(question.clone());
                        }
                    }
                }

                self.faults.check(points::EXERCISE_AFTER_ROW_UPDATE)?;

                let Some(content) = &patch.data_content else {
                    return Ok(Some(DataWrite::Skipped));
                };
                let mut updated = 0;
                for data in t.exercise_data.values_mut().filter(|d| d.exercise_id == id) {
                    data.data = Some(content.clone());
                    updated += 1;
                }
                if updated > 0 {
                    return Ok(Some(DataWrite::Updated));
                }
                insert_data_row(t, id, content)?;
                Ok(Some(DataWrite::Inserted))
            })?;
            Ok(write.unwrap_or(DataWrite::Skipped))
        })
    }
}
