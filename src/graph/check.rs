use std::collections::HashSet;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex as PetIndex};
use serde::Serialize;

use crate::core::course::{CourseId, RelationKind};
use crate::core::department::Department;
use crate::graph::builder::build_graph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub course: CourseId,
    pub missing: CourseId,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub department: String,
    pub cycles: Vec<Vec<CourseId>>,
    pub dangling: Vec<DanglingReference>,
    pub duplicates: Vec<CourseId>,
}

impl ValidationReport {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.cycles.is_empty() && self.dangling.is_empty() && self.duplicates.is_empty()
    }
}

/// Checks a department's course data. Dangling references are legal course
/// data and are only reported; cycles break layering and should be fixed at
/// the source.
pub fn validate(department: &Department) -> ValidationReport {
    let graph = build_graph(department);

    let mut dag: DiGraph<usize, ()> = DiGraph::with_capacity(graph.len(), 0);
    let nodes: Vec<PetIndex> = (0..graph.len()).map(|idx| dag.add_node(idx)).collect();
    for (idx, node) in nodes.iter().enumerate() {
        for &pre in graph.prerequisite_indices(idx) {
            dag.add_edge(nodes[pre], *node, ());
        }
    }

    let mut cycles: Vec<Vec<CourseId>> = tarjan_scc(&dag)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || dag.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut ids: Vec<CourseId> = component
                .into_iter()
                .map(|node| graph.id(dag[node]).clone())
                .collect();
            ids.sort();
            ids
        })
        .collect();
    cycles.sort();
    for cycle in &cycles {
        tracing::warn!(department = %department.id, ?cycle, "prerequisite cycle");
    }

    let mut dangling = Vec::new();
    for course in &department.courses {
        let relations = course
            .prerequisites
            .iter()
            .map(|id| (id, RelationKind::Prerequisite))
            .chain(
                course
                    .corequisites
                    .iter()
                    .map(|id| (id, RelationKind::Corequisite)),
            );
        for (missing, kind) in relations {
            if !graph.contains(missing) {
                dangling.push(DanglingReference {
                    course: course.id.clone(),
                    missing: missing.clone(),
                    kind,
                });
            }
        }
    }

    let mut seen = HashSet::new();
    let mut duplicates: Vec<CourseId> = department
        .courses
        .iter()
        .filter(|course| !seen.insert(course.id.clone()))
        .map(|course| course.id.clone())
        .collect();
    duplicates.sort();
    duplicates.dedup();

    ValidationReport {
        department: department.id.clone(),
        cycles,
        dangling,
        duplicates,
    }
}
