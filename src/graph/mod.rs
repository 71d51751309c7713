use std::collections::HashMap;

use crate::core::course::{Category, Course, CourseId};

pub mod builder;
pub mod check;
pub mod details;
pub mod ops;
pub mod viz;

pub use builder::build_graph;

/// Index of a course inside a [`CourseGraph`].
pub type NodeIndex = usize;

/// Immutable prerequisite/corequisite structure of one department.
///
/// Courses live in an arena in department order; every relation is stored as
/// arena indices and only references courses of the same department.
/// `dependents` is derived from `prerequisites` when the graph is built and is
/// never edited on its own.
#[derive(Debug, Clone, Default)]
pub struct CourseGraph {
    pub(crate) courses: Vec<Course>,
    pub(crate) index: HashMap<CourseId, NodeIndex>,
    pub(crate) prerequisites: Vec<Vec<NodeIndex>>,
    pub(crate) corequisites: Vec<Vec<NodeIndex>>,
    pub(crate) dependents: Vec<Vec<NodeIndex>>,
    pub(crate) isolated: Vec<bool>,
}

impl CourseGraph {
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn index_of(&self, id: &CourseId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.index.contains_key(id)
    }

    pub fn course(&self, idx: NodeIndex) -> &Course {
        &self.courses[idx]
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn id(&self, idx: NodeIndex) -> &CourseId {
        &self.courses[idx].id
    }

    pub fn category(&self, idx: NodeIndex) -> Category {
        self.courses[idx].category
    }

    pub fn prerequisite_indices(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.prerequisites[idx]
    }

    pub fn corequisite_indices(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.corequisites[idx]
    }

    pub fn dependent_indices(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.dependents[idx]
    }

    pub fn is_isolated_index(&self, idx: NodeIndex) -> bool {
        self.isolated[idx]
    }

    /// In-department prerequisites of `id`; empty for unknown ids.
    pub fn prerequisites_of(&self, id: &CourseId) -> Vec<&CourseId> {
        self.index_of(id)
            .map(|idx| self.ids(&self.prerequisites[idx]))
            .unwrap_or_default()
    }

    /// Courses that list `id` as a prerequisite. Corequisite references are
    /// not dependents.
    pub fn dependents_of(&self, id: &CourseId) -> Vec<&CourseId> {
        self.index_of(id)
            .map(|idx| self.ids(&self.dependents[idx]))
            .unwrap_or_default()
    }

    pub fn corequisites_of(&self, id: &CourseId) -> Vec<&CourseId> {
        self.index_of(id)
            .map(|idx| self.ids(&self.corequisites[idx]))
            .unwrap_or_default()
    }

    pub fn is_isolated(&self, id: &CourseId) -> bool {
        self.index_of(id)
            .map(|idx| self.isolated[idx])
            .unwrap_or(false)
    }

    fn ids(&self, indices: &[NodeIndex]) -> Vec<&CourseId> {
        indices.iter().map(|&idx| &self.courses[idx].id).collect()
    }
}
