//! Flat join row
//!
//! One row of the aggregate `superLessons ⟕ sections ⟕ lessons ⟕ exercises ⟕
//! exercise_data` query. Every column below the super-lesson level is
//! nullable because of the outer joins.

use chrono::{DateTime, Utc};

/// A single row of the aggregate tree query.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct TreeRow {
    pub super_id: i64,
    pub super_title: Option<String>,
    pub super_description: Option<String>,

    pub section_id: Option<i64>,
    pub section_title: Option<String>,
    pub section_position: Option<i32>,

    pub lesson_id: Option<i64>,
    pub lesson_title: Option<String>,
    pub lesson_intro: Option<String>,
    pub lesson_before_exercise: Option<String>,
    pub lesson_outro: Option<String>,
    pub lesson_section_id: Option<i64>,
    pub lesson_created_at: Option<DateTime<Utc>>,
    pub lesson_updated_at: Option<DateTime<Utc>>,

    pub exercise_id: Option<i64>,
    pub exercise_lesson_id: Option<i64>,
    pub exercise_type: Option<String>,
    pub exercise_question: Option<String>,
    pub exercise_created_at: Option<DateTime<Utc>>,

    pub data_id: Option<i64>,
    pub data: Option<String>,
}

impl TreeRow {
    /// Row for a super-lesson that matched no section.
    pub fn super_only(id: i64, title: impl Into<String>) -> Self {
        Self {
            super_id: id,
            super_title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_section(mut self, id: i64, title: impl Into<String>, position: Option<i32>) -> Self {
        self.section_id = Some(id);
        self.section_title = Some(title.into());
        self.section_position = position;
        self
    }

    pub fn with_lesson(mut self, id: i64, title: impl Into<String>) -> Self {
        self.lesson_id = Some(id);
        self.lesson_title = Some(title.into());
        self.lesson_section_id = self.section_id;
        self
    }

    pub fn with_exercise(mut self, id: i64, question: impl Into<String>) -> Self {
        self.exercise_id = Some(id);
        self.exercise_lesson_id = self.lesson_id;
        self.exercise_question = Some(question.into());
        self
    }

    pub fn with_data(mut self, id: i64, data: impl Into<String>) -> Self {
        self.data_id = Some(id);
        self.data = Some(data.into());
        self
    }
}
