use std::collections::{HashMap, HashSet};

use crate::core::course::{Course, CourseId};
use crate::core::department::Department;
use crate::graph::{CourseGraph, NodeIndex};

pub fn build_graph(department: &Department) -> CourseGraph {
    build_graph_from(&department.courses)
}

pub fn build_graph_from(courses: &[Course]) -> CourseGraph {
    let mut arena: Vec<Course> = Vec::with_capacity(courses.len());
    let mut index: HashMap<CourseId, NodeIndex> = HashMap::new();
    for course in courses {
        if index.contains_key(&course.id) {
            tracing::warn!(course = %course.id, "duplicate course id, keeping the first entry");
            continue;
        }
        index.insert(course.id.clone(), arena.len());
        arena.push(course.clone());
    }

    let prerequisites: Vec<Vec<NodeIndex>> = arena
        .iter()
        .map(|course| resolve_relations(&course.prerequisites, &index))
        .collect();
    let corequisites: Vec<Vec<NodeIndex>> = arena
        .iter()
        .map(|course| resolve_relations(&course.corequisites, &index))
        .collect();

    let mut dependents: Vec<Vec<NodeIndex>> = vec![Vec::new(); arena.len()];
    for (idx, prereqs) in prerequisites.iter().enumerate() {
        for &pre in prereqs {
            dependents[pre].push(idx);
        }
    }

    let referenced = referenced_ids(&arena);
    let isolated = arena
        .iter()
        .map(|course| isolated_given(course, &referenced))
        .collect();

    CourseGraph {
        courses: arena,
        index,
        prerequisites,
        corequisites,
        dependents,
        isolated,
    }
}

/// Ids named by any course as prerequisite or corequisite.
pub(crate) fn referenced_ids(courses: &[Course]) -> HashSet<&str> {
    courses
        .iter()
        .flat_map(|course| course.prerequisites.iter().chain(&course.corequisites))
        .map(CourseId::as_str)
        .collect()
}

/// A course is isolated when it declares no relation and nobody names it.
pub(crate) fn isolated_given(course: &Course, referenced: &HashSet<&str>) -> bool {
    course.prerequisites.is_empty()
        && course.corequisites.is_empty()
        && !referenced.contains(course.id.as_str())
}

fn resolve_relations(ids: &[CourseId], index: &HashMap<CourseId, NodeIndex>) -> Vec<NodeIndex> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter_map(|id| index.get(id).copied())
        .filter(|idx| seen.insert(*idx))
        .collect()
}
