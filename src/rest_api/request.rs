//! # Request Bodies
//!
//! JSON bodies accepted by the mutation endpoints. Each one validates into
//! the store's input type. `null` and absent fields are treated alike, except
//! for a super-lesson's description, where `null` clears it.

use serde::{Deserialize, Deserializer};

use crate::store::{
    ExercisePatch, LessonPatch, NewSection, NewSuperLesson, SectionPatch, SuperLessonPatch,
};

use super::errors::{ApiError, ApiResult};

/// Keeps an explicit JSON `null` apart from an absent field: absent stays
/// `None` through `#[serde(default)]`, `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trimmed title, or `None` when missing or blank.
fn clean_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// `POST /api/super-lessons`
#[derive(Debug, Default, Deserialize)]
pub struct CreateSuperLessonRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateSuperLessonRequest {
    pub fn validate(self) -> ApiResult<NewSuperLesson> {
        let title = clean_title(self.title).ok_or_else(|| ApiError::validation("Title is required"))?;
        Ok(NewSuperLesson {
            title,
            description: self.description.filter(|d| !d.is_empty()),
        })
    }
}

/// `PATCH /api/super-lessons/:id`. `"description": null` clears the
/// description; leaving the field out keeps it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSuperLessonRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

impl UpdateSuperLessonRequest {
    pub fn into_patch(self) -> SuperLessonPatch {
        SuperLessonPatch {
            title: clean_title(self.title),
            description: self.description,
        }
    }
}

/// `POST /api/sections`. `lessonId` is the owning super-lesson's id.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSectionRequest {
    #[serde(
        rename = "lessonId",
        default,
        deserialize_with = "crate::ids::deserialize_opt"
    )]
    pub lesson_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

impl CreateSectionRequest {
    pub fn validate(self) -> ApiResult<NewSection> {
        let super_lesson_id = self
            .lesson_id
            .ok_or_else(|| ApiError::validation("lessonId is required"))?;
        let title = clean_title(self.title).ok_or_else(|| ApiError::validation("title is required"))?;
        Ok(NewSection {
            super_lesson_id,
            title,
            position: self.position,
        })
    }
}

/// `PATCH /api/sections/:id`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSectionRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

impl UpdateSectionRequest {
    pub fn into_patch(self) -> SectionPatch {
        SectionPatch {
            title: clean_title(self.title),
            position: self.position,
        }
    }
}

/// `PATCH /api/lessons/:lessonId`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLessonRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub before_exercise: Option<String>,
    #[serde(default)]
    pub outro: Option<String>,
}

impl UpdateLessonRequest {
    pub fn validate(self) -> ApiResult<LessonPatch> {
        let patch = LessonPatch {
            title: clean_title(self.title),
            intro: self.intro,
            before_exercise: self.before_exercise,
            outro: self.outro,
        };
        if patch.is_empty() {
            return Err(ApiError::validation("No fields to update"));
        }
        Ok(patch)
    }
}

/// `PATCH /api/exercises/:exerciseId`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExerciseRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub data_content: Option<String>,
}

impl UpdateExerciseRequest {
    pub fn validate(self) -> ApiResult<ExercisePatch> {
        let patch = ExercisePatch {
            kind: self.kind,
            question: self.question,
            data_content: self.data_content,
        };
        if patch.is_empty() {
            return Err(ApiError::validation("No fields to update"));
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_super_lesson_title_trimmed_and_required() {
        let req: CreateSuperLessonRequest =
            serde_json::from_value(json!({"title": "  Algebra  "})).unwrap();
        assert_eq!(req.validate().unwrap().title, "Algebra");

        let blank: CreateSuperLessonRequest =
            serde_json::from_value(json!({"title": "   "})).unwrap();
        assert!(matches!(blank.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_super_lesson_description_null_clears() {
        let absent: UpdateSuperLessonRequest =
            serde_json::from_value(json!({"title": "Algebra"})).unwrap();
        assert_eq!(absent.into_patch().description, None);

        let null: UpdateSuperLessonRequest =
            serde_json::from_value(json!({"description": null})).unwrap();
        assert_eq!(null.into_patch().description, Some(None));

        let set: UpdateSuperLessonRequest =
            serde_json::from_value(json!({"description": "Základy"})).unwrap();
        assert_eq!(set.into_patch().description, Some(Some("Základy".to_string())));
    }

    #[test]
    fn test_section_requires_lesson_id_first() {
        let req: CreateSectionRequest = serde_json::from_value(json!({})).unwrap();
        match req.validate() {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "lessonId is required"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_section_lesson_id_as_string() {
        let req: CreateSectionRequest =
            serde_json::from_value(json!({"lessonId": "12", "title": "Úvod", "position": 2}))
                .unwrap();
        let new = req.validate().unwrap();
        assert_eq!(new.super_lesson_id, 12);
        assert_eq!(new.position, Some(2));
    }

    #[test]
    fn test_empty_section_patch_keeps_everything() {
        let req: UpdateSectionRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.into_patch(), SectionPatch::default());
    }

    #[test]
    fn test_lesson_patch_requires_a_field() {
        let req: UpdateLessonRequest = serde_json::from_value(json!({"title": " "})).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateLessonRequest =
            serde_json::from_value(json!({"before_exercise": "Pozor"})).unwrap();
        assert_eq!(req.validate().unwrap().before_exercise.as_deref(), Some("Pozor"));
    }

    #[test]
    fn test_exercise_type_field() {
        let req: UpdateExerciseRequest =
            serde_json::from_value(json!({"type": "choice"})).unwrap();
        assert_eq!(req.validate().unwrap().kind.as_deref(), Some("choice"));

        let empty: UpdateExerciseRequest = serde_json::from_value(json!({})).unwrap();
        assert!(empty.validate().is_err());
    }
}
