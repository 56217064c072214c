//! # Lesson Tree
//!
//! Rebuilds the nested super-lesson → section → lesson → exercise tree from
//! the flat rows of the aggregate LEFT JOIN query.
//!
//! # Invariants
//!
//! - Every super-lesson in the input appears in the output, even without sections
//! - A child appears only if its id column is non-null in some row
//! - Each child id appears once per parent, however many rows mention it
//! - Sibling order is first-appearance order of the (pre-sorted) input

mod builder;
mod node;
mod row;

pub use builder::{build_tree, TreeBuilder};
pub use node::{ExerciseNode, LessonNode, SectionNode, SuperLessonNode, UNTITLED_LESSON_LABEL};
pub use row::TreeRow;
