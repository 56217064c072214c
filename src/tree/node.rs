//! Tree nodes
//!
//! The serialized shape is the front-end contract: a section's lessons are
//! listed under `exercises`, and a lesson's exercises under `content`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Label shown for a lesson without a title ("untitled").
pub const UNTITLED_LESSON_LABEL: &str = "Bez názvu";

/// Top-level grouping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperLessonNode {
    #[serde(serialize_with = "crate::ids::serialize")]
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub sections: Vec<SectionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionNode {
    #[serde(serialize_with = "crate::ids::serialize")]
    pub id: i64,
    pub title: Option<String>,
    pub position: Option<i32>,
    #[serde(rename = "exercises")]
    pub lessons: Vec<LessonNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonNode {
    #[serde(serialize_with = "crate::ids::serialize")]
    pub id: i64,
    pub label: String,
    pub title: Option<String>,
    pub intro: Option<String>,
    pub before_exercise: Option<String>,
    pub outro: Option<String>,
    #[serde(serialize_with = "crate::ids::serialize")]
    pub section_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "content")]
    pub exercises: Vec<ExerciseNode>,
}

impl LessonNode {
    /// Display label: the title, or the untitled placeholder when it is
    /// missing or empty.
    pub fn label_for(title: Option<&str>) -> String {
        match title {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => UNTITLED_LESSON_LABEL.to_string(),
        }
    }
}

/// Exercise together with its (optional) exercise-data payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseNode {
    #[serde(serialize_with = "crate::ids::serialize")]
    pub id: i64,
    #[serde(serialize_with = "crate::ids::serialize")]
    pub lesson_id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub question: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "crate::ids::serialize_opt")]
    pub data_id: Option<i64>,
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_super_lesson_shape() {
        let node = SuperLessonNode {
            id: 1,
            title: Some("Algebra".to_string()),
            description: None,
            sections: vec![],
        };

        let json = serde_json::to_value(vec![node]).unwrap();
        assert_eq!(
            json,
            json!([{"id": "1", "title": "Algebra", "description": null, "sections": []}])
        );
    }

    #[test]
    fn test_child_list_field_names() {
        let section = SectionNode {
            id: 2,
            title: Some("Rovnice".to_string()),
            position: Some(1),
            lessons: vec![LessonNode {
                id: 3,
                label: LessonNode::label_for(None),
                title: None,
                intro: None,
                before_exercise: None,
                outro: None,
                section_id: 2,
                created_at: None,
                updated_at: None,
                exercises: vec![],
            }],
        };

        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["exercises"][0]["id"], "3");
        assert_eq!(json["exercises"][0]["label"], UNTITLED_LESSON_LABEL);
        assert_eq!(json["exercises"][0]["content"], json!([]));
    }

    #[test]
    fn test_label_falls_back_on_empty_title() {
        assert_eq!(LessonNode::label_for(Some("")), UNTITLED_LESSON_LABEL);
        assert_eq!(LessonNode::label_for(Some("Zlomky")), "Zlomky");
    }

    #[test]
    fn test_exercise_type_field_name() {
        let exercise = ExerciseNode {
            id: 9,
            lesson_id: 3,
            kind: Some("quiz".to_string()),
            question: Some("2 + 2?".to_string()),
            created_at: None,
            data_id: None,
            data: None,
        };

        let json = serde_json::to_value(&exercise).unwrap();
        assert_eq!(json["type"], "quiz");
        assert_eq!(json["data_id"], serde_json::Value::Null);
    }
}
