//! Tree assembly
//!
//! Single pass over pre-sorted join rows. Each level keeps an index table
//! from (parent slot, child id) to the child's slot in the parent's ordered
//! list, so nodes never point back at their parents. The tables are dropped
//! by [`TreeBuilder::finish`].

use std::collections::{HashMap, HashSet};

use super::node::{ExerciseNode, LessonNode, SectionNode, SuperLessonNode};
use super::row::TreeRow;

/// Incremental builder over a row stream.
///
/// Rows must arrive in the order the aggregate query produces them; the
/// builder never re-sorts, so sibling order is first-appearance order.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    supers: Vec<SuperLessonNode>,
    super_slots: HashMap<i64, usize>,
    section_slots: HashMap<(usize, i64), usize>,
    lesson_slots: HashMap<(usize, usize, i64), usize>,
    exercises_seen: HashSet<(usize, usize, usize, i64)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one join row into the tree.
    pub fn push(&mut self, row: TreeRow) {
        let TreeRow {
            super_id,
            super_title,
            super_description,
            section_id,
            section_title,
            section_position,
            lesson_id,
            lesson_title,
            lesson_intro,
            lesson_before_exercise,
            lesson_outro,
            lesson_section_id,
            lesson_created_at,
            lesson_updated_at,
            exercise_id,
            exercise_lesson_id,
            exercise_type,
            exercise_question,
            exercise_created_at,
            data_id,
            data,
        } = row;

        let supers = &mut self.supers;
        let s = *self.super_slots.entry(super_id).or_insert_with(|| {
            supers.push(SuperLessonNode {
                id: super_id,
                title: super_title,
                description: super_description,
                sections: Vec::new(),
            });
            supers.len() - 1
        });

        // NULL section: the super-lesson stays, with nothing under it
        let Some(section_id) = section_id else {
            return;
        };
        let sections = &mut self.supers[s].sections;
        let sec = *self.section_slots.entry((s, section_id)).or_insert_with(|| {
            sections.push(SectionNode {
                id: section_id,
                title: section_title,
                position: section_position,
                lessons: Vec::new(),
            });
            sections.len() - 1
        });

        let Some(lesson_id) = lesson_id else {
            return;
        };
        let lessons = &mut self.supers[s].sections[sec].lessons;
        // Lesson fields are taken from the first row only
        let les = *self
            .lesson_slots
            .entry((s, sec, lesson_id))
            .or_insert_with(|| {
                lessons.push(LessonNode {
                    id: lesson_id,
                    label: LessonNode::label_for(lesson_title.as_deref()),
                    title: lesson_title,
                    intro: lesson_intro,
                    before_exercise: lesson_before_exercise,
                    outro: lesson_outro,
                    section_id: lesson_section_id.unwrap_or(section_id),
                    created_at: lesson_created_at,
                    updated_at: lesson_updated_at,
                    exercises: Vec::new(),
                });
                lessons.len() - 1
            });

        let Some(exercise_id) = exercise_id else {
            return;
        };
        if self.exercises_seen.insert((s, sec, les, exercise_id)) {
            self.supers[s].sections[sec].lessons[les]
                .exercises
                .push(ExerciseNode {
                    id: exercise_id,
                    lesson_id: exercise_lesson_id.unwrap_or(lesson_id),
                    kind: exercise_type,
                    question: exercise_question,
                    created_at: exercise_created_at,
                    data_id,
                    data,
                });
        }
    }

    /// Number of super-lessons seen so far.
    pub fn len(&self) -> usize {
        self.supers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supers.is_empty()
    }

    /// Discard the index tables and return the forest.
    pub fn finish(self) -> Vec<SuperLessonNode> {
        self.supers
    }
}

/// Build the full super-lesson forest from pre-sorted join rows.
pub fn build_tree<I>(rows: I) -> Vec<SuperLessonNode>
where
    I: IntoIterator<Item = TreeRow>,
{
    let mut builder = TreeBuilder::new();
    for row in rows {
        builder.push(row);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_forest() {
        assert!(build_tree(Vec::new()).is_empty());
    }

    #[test]
    fn test_super_lesson_without_sections() {
        let tree = build_tree(vec![TreeRow::super_only(1, "Algebra")]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, 1);
        assert_eq!(tree[0].title.as_deref(), Some("Algebra"));
        assert!(tree[0].sections.is_empty());
    }

    #[test]
    fn test_data_fan_out_does_not_duplicate_exercise() {
        let base = TreeRow::super_only(1, "Algebra")
            .with_section(10, "Rovnice", Some(1))
            .with_lesson(100, "Lineární rovnice")
            .with_exercise(1000, "x + 1 = 2");
        let rows = vec![
            base.clone().with_data(1, "first"),
            base.clone().with_data(2, "second"),
        ];

        let tree = build_tree(rows);
        let exercises = &tree[0].sections[0].lessons[0].exercises;

        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].data.as_deref(), Some("first"));
    }

    #[test]
    fn test_lesson_fields_set_once() {
        let first = TreeRow::super_only(1, "Algebra")
            .with_section(10, "Rovnice", None)
            .with_lesson(100, "Original")
            .with_exercise(1000, "q1");
        let mut second = first.clone().with_exercise(1001, "q2");
        second.lesson_title = Some("Overwritten".to_string());

        let tree = build_tree(vec![first, second]);
        let lesson = &tree[0].sections[0].lessons[0];

        assert_eq!(lesson.title.as_deref(), Some("Original"));
        assert_eq!(lesson.exercises.len(), 2);
    }

    #[test]
    fn test_null_exercise_keeps_lesson() {
        let rows = vec![TreeRow::super_only(1, "Algebra")
            .with_section(10, "Rovnice", None)
            .with_lesson(100, "Prázdná")];

        let tree = build_tree(rows);
        let lesson = &tree[0].sections[0].lessons[0];

        assert_eq!(lesson.section_id, 10);
        assert!(lesson.exercises.is_empty());
    }

    #[test]
    fn test_null_titles_stay_null() {
        let mut row = TreeRow::super_only(1, "ignored").with_section(10, "ignored", Some(1));
        row.super_title = None;
        row.section_title = None;

        let tree = build_tree(vec![row]);
        let json = serde_json::to_value(&tree).unwrap();

        assert!(json[0]["title"].is_null());
        assert!(json[0]["sections"][0]["title"].is_null());
    }

    #[test]
    fn test_builder_len_tracks_super_lessons() {
        let mut builder = TreeBuilder::new();
        assert!(builder.is_empty());

        builder.push(TreeRow::super_only(1, "A").with_section(1, "s", None));
        builder.push(TreeRow::super_only(1, "A").with_section(2, "t", None));
        builder.push(TreeRow::super_only(2, "B"));

        assert_eq!(builder.len(), 2);
    }
}
