use std::collections::{HashMap, HashSet};

use crate::core::course::{Course, CourseId};
use crate::graph::builder::{build_graph_from, isolated_given, referenced_ids};
use crate::graph::{CourseGraph, NodeIndex};

/// Layer depth of every course, indexed like the graph arena.
///
/// A course without in-department prerequisites sits at depth 0, otherwise one
/// below its deepest prerequisite. A course that declares corequisites but no
/// prerequisites takes the deepest depth among its corequisites instead, so a
/// corequisite pair shares a layer.
///
/// Cycles terminate: a course reached again while it is still being resolved
/// counts as depth 0 at that point. Depths inside a cycle carry no meaning.
pub fn depths(graph: &CourseGraph) -> Vec<usize> {
    let len = graph.len();
    let mut resolved: Vec<Option<usize>> = vec![None; len];
    for idx in 0..len {
        if resolved[idx].is_none() {
            let mut visiting = HashSet::new();
            resolve_depth(graph, idx, &mut resolved, &mut visiting);
        }
    }

    let mut depths: Vec<usize> = resolved.into_iter().map(Option::unwrap_or_default).collect();

    for idx in 0..len {
        let course = graph.course(idx);
        if course.corequisites.is_empty() || !course.prerequisites.is_empty() {
            continue;
        }
        let partner_depth = graph
            .corequisite_indices(idx)
            .iter()
            .map(|&partner| depths[partner])
            .max();
        if let Some(depth) = partner_depth {
            depths[idx] = depth;
        }
    }

    depths
}

/// Depth per course id for a raw course list.
pub fn compute_depths(courses: &[Course]) -> HashMap<CourseId, usize> {
    let graph = build_graph_from(courses);
    depths(&graph)
        .into_iter()
        .enumerate()
        .map(|(idx, depth)| (graph.id(idx).clone(), depth))
        .collect()
}

fn resolve_depth(
    graph: &CourseGraph,
    idx: NodeIndex,
    resolved: &mut [Option<usize>],
    visiting: &mut HashSet<NodeIndex>,
) -> usize {
    if let Some(depth) = resolved[idx] {
        return depth;
    }
    if !visiting.insert(idx) {
        tracing::debug!(course = %graph.id(idx), "prerequisite cycle reached during depth resolution");
        return 0;
    }

    let prereqs = graph.prerequisite_indices(idx);
    let depth = if prereqs.is_empty() {
        0
    } else {
        prereqs
            .iter()
            .map(|&pre| resolve_depth(graph, pre, resolved, visiting))
            .max()
            .unwrap_or(0)
            + 1
    };
    resolved[idx] = Some(depth);
    depth
}

/// True when `course` declares no prerequisite or corequisite and no course in
/// `courses` names it as one.
pub fn is_isolated(course: &Course, courses: &[Course]) -> bool {
    isolated_given(course, &referenced_ids(courses))
}

/// Every course reachable from `start` by repeatedly following prerequisites.
pub fn prerequisite_closure(graph: &CourseGraph, start: NodeIndex) -> HashSet<NodeIndex> {
    closure(start, |idx| graph.prerequisite_indices(idx))
}

/// Every course reachable from `start` by repeatedly following dependents.
pub fn dependent_closure(graph: &CourseGraph, start: NodeIndex) -> HashSet<NodeIndex> {
    closure(start, |idx| graph.dependent_indices(idx))
}

fn closure<'a, F>(start: NodeIndex, next: F) -> HashSet<NodeIndex>
where
    F: Fn(NodeIndex) -> &'a [NodeIndex],
{
    let mut seen = HashSet::new();
    let mut stack: Vec<NodeIndex> = next(start).to_vec();
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        stack.extend(next(current).iter().copied());
    }
    seen
}

pub fn transitive_prerequisites(graph: &CourseGraph, id: &CourseId) -> Vec<CourseId> {
    sorted_ids(graph, id, prerequisite_closure)
}

pub fn transitive_dependents(graph: &CourseGraph, id: &CourseId) -> Vec<CourseId> {
    sorted_ids(graph, id, dependent_closure)
}

fn sorted_ids(
    graph: &CourseGraph,
    id: &CourseId,
    walk: fn(&CourseGraph, NodeIndex) -> HashSet<NodeIndex>,
) -> Vec<CourseId> {
    let Some(start) = graph.index_of(id) else {
        return Vec::new();
    };
    let mut out: Vec<CourseId> = walk(graph, start)
        .into_iter()
        .map(|idx| graph.id(idx).clone())
        .collect();
    out.sort();
    out
}

/// Courses linked to a selection through the prerequisite relation.
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    pub selected: NodeIndex,
    pub prerequisites: HashSet<NodeIndex>,
    pub dependents: HashSet<NodeIndex>,
}

impl Connectivity {
    pub fn of(graph: &CourseGraph, selected: NodeIndex) -> Self {
        Self {
            selected,
            prerequisites: prerequisite_closure(graph, selected),
            dependents: dependent_closure(graph, selected),
        }
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        idx == self.selected || self.prerequisites.contains(&idx) || self.dependents.contains(&idx)
    }

    /// Whether an edge leaving `source` flows along the selection's
    /// prerequisite chain.
    pub fn on_prerequisite_side(&self, source: NodeIndex) -> bool {
        source == self.selected || self.prerequisites.contains(&source)
    }
}

/// `{id} ∪ ancestors ∪ descendants`, empty when `id` is not in the graph.
pub fn connected_set(graph: &CourseGraph, id: &CourseId) -> Vec<CourseId> {
    let Some(start) = graph.index_of(id) else {
        return Vec::new();
    };
    let connectivity = Connectivity::of(graph, start);
    let mut out: Vec<CourseId> = (0..graph.len())
        .filter(|&idx| connectivity.contains(idx))
        .map(|idx| graph.id(idx).clone())
        .collect();
    out.sort();
    out
}
