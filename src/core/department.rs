use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::course::{Course, CourseId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Department {
    pub fn new(id: impl Into<String>, name: impl Into<String>, courses: Vec<Course>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            courses,
        }
    }

    pub fn course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| &course.id == id)
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.course(id).is_some()
    }

    pub fn total_credits(&self) -> u32 {
        self.courses.iter().map(|course| course.credits).sum()
    }

    /// Credits of the completed courses that belong to this department.
    pub fn completed_credits(&self, completed: &BTreeSet<CourseId>) -> u32 {
        self.courses
            .iter()
            .filter(|course| completed.contains(&course.id))
            .map(|course| course.credits)
            .sum()
    }
}
