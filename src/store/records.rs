//! Row types returned by writes, and the validated inputs they take.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// `superLessons` row as returned by create/update
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SuperLessonRecord {
    #[serde(serialize_with = "crate::ids::serialize")]
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// `sections` row as returned by create/update
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SectionRecord {
    #[serde(serialize_with = "crate::ids::serialize")]
    pub id: i64,
    pub title: Option<String>,
    pub position: Option<i32>,
}

/// `lessons` row
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct LessonRecord {
    #[serde(serialize_with = "crate::ids::serialize")]
    pub id: i64,
    pub title: Option<String>,
    pub intro: Option<String>,
    pub before_exercise: Option<String>,
    pub outro: Option<String>,
    #[serde(serialize_with = "crate::ids::serialize")]
    pub section_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSuperLesson {
    pub title: String,
    pub description: Option<String>,
}

/// `None` fields keep their stored value. `description: Some(None)`
/// clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuperLessonPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSection {
    pub super_lesson_id: i64,
    pub title: String,
    pub position: Option<i32>,
}

/// `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub position: Option<i32>,
}

/// `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonPatch {
    pub title: Option<String>,
    pub intro: Option<String>,
    pub before_exercise: Option<String>,
    pub outro: Option<String>,
}

impl LessonPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.intro.is_none()
            && self.before_exercise.is_none()
            && self.outro.is_none()
    }
}

/// Exercise update. `data_content` goes to the exercise's data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExercisePatch {
    pub kind: Option<String>,
    pub question: Option<String>,
    pub data_content: Option<String>,
}

impl ExercisePatch {
    pub fn is_empty(&self) -> bool {
        !self.touches_exercise_row() && self.data_content.is_none()
    }

    /// Whether the `exercises` row itself needs an UPDATE.
    pub fn touches_exercise_row(&self) -> bool {
        self.kind.is_some() || self.question.is_some()
    }
}

/// What the exercise update did to the exercise-data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataWrite {
    /// No `data_content` given
    Skipped,
    /// Existing row overwritten
    Updated,
    /// No row existed; one was inserted
    Inserted,
}
