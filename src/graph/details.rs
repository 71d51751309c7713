use serde::Serialize;

use crate::core::course::{Category, CourseId};
use crate::graph::{CourseGraph, NodeIndex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedCourse {
    pub id: CourseId,
    pub name: String,
}

/// Everything shown for a single selected course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDetails {
    pub id: CourseId,
    pub name: String,
    pub credits: u32,
    pub category: Category,
    pub depth: usize,
    pub isolated: bool,
    pub prerequisites: Vec<RelatedCourse>,
    pub dependents: Vec<RelatedCourse>,
    pub corequisites: Vec<RelatedCourse>,
}

/// Detail panel data for `id`, or `None` when the course is not in the graph.
/// Related courses are listed in department order and dangling ids are
/// skipped.
pub fn course_details(
    graph: &CourseGraph,
    depths: &[usize],
    id: &CourseId,
) -> Option<CourseDetails> {
    let idx = graph.index_of(id)?;
    let course = graph.course(idx);
    Some(CourseDetails {
        id: course.id.clone(),
        name: course.name.clone(),
        credits: course.credits,
        category: course.category,
        depth: depths.get(idx).copied().unwrap_or_default(),
        isolated: graph.is_isolated_index(idx),
        prerequisites: related(graph, graph.prerequisite_indices(idx)),
        dependents: related(graph, graph.dependent_indices(idx)),
        corequisites: related(graph, graph.corequisite_indices(idx)),
    })
}

fn related(graph: &CourseGraph, indices: &[NodeIndex]) -> Vec<RelatedCourse> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted
        .into_iter()
        .map(|idx| {
            let course = graph.course(idx);
            RelatedCourse {
                id: course.id.clone(),
                name: course.name.clone(),
            }
        })
        .collect()
}
