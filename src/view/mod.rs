use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::course::{CourseId, RelationKind};
use crate::graph::ops::Connectivity;
use crate::graph::{CourseGraph, NodeIndex};
use crate::layout::LayoutEdge;

pub mod filter;

pub use filter::{CategorySet, FilterState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeState {
    pub highlighted: bool,
    pub dimmed: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeVisibility {
    Visible,
    Faint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeState {
    pub visibility: EdgeVisibility,
    pub emphasized: bool,
}

/// Render attributes keyed by course id and edge id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    pub nodes: BTreeMap<CourseId, NodeState>,
    pub edges: BTreeMap<String, EdgeState>,
}

impl DerivedView {
    pub fn node(&self, id: &CourseId) -> Option<&NodeState> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeState> {
        self.edges.get(id)
    }
}

/// Courses that are not completed and whose in-department prerequisites all
/// are.
pub fn available_courses(graph: &CourseGraph, completed: &BTreeSet<CourseId>) -> Vec<CourseId> {
    let mut out: Vec<CourseId> = availability(graph, completed)
        .into_iter()
        .enumerate()
        .filter(|(_, available)| *available)
        .map(|(idx, _)| graph.id(idx).clone())
        .collect();
    out.sort();
    out
}

fn availability(graph: &CourseGraph, completed: &BTreeSet<CourseId>) -> Vec<bool> {
    (0..graph.len())
        .map(|idx| {
            !completed.contains(graph.id(idx))
                && graph
                    .prerequisite_indices(idx)
                    .iter()
                    .all(|&pre| completed.contains(graph.id(pre)))
        })
        .collect()
}

/// Narrowing predicates evaluated in order: category, availability,
/// selection. A later stage only decides nodes an earlier one left lit.
struct Stages {
    category_hidden: Vec<bool>,
    available: Option<Vec<bool>>,
    selection: Option<Connectivity>,
}

impl Stages {
    fn new(graph: &CourseGraph, filters: &FilterState, completed: &BTreeSet<CourseId>) -> Self {
        let category_hidden = (0..graph.len())
            .map(|idx| !filters.categories.admits(graph.category(idx)))
            .collect();
        let available = filters
            .available_only
            .then(|| availability(graph, completed));
        let selection = filters.selected.as_ref().and_then(|id| {
            let start = graph.index_of(id);
            if start.is_none() {
                tracing::debug!(course = %id, "selected course is not part of the department");
            }
            start.map(|idx| Connectivity::of(graph, idx))
        });
        Self {
            category_hidden,
            available,
            selection,
        }
    }

    fn node_dimmed(&self, idx: NodeIndex) -> bool {
        if self.category_hidden[idx] {
            return true;
        }
        // An active selection replaces availability dimming.
        if let Some(selection) = &self.selection {
            return !selection.contains(idx);
        }
        match &self.available {
            Some(available) => !available[idx],
            None => false,
        }
    }

    fn edge_faint(&self, source: NodeIndex, target: NodeIndex) -> bool {
        if self.category_hidden[source] || self.category_hidden[target] {
            return true;
        }
        if let Some(selection) = &self.selection {
            return !(selection.contains(source) && selection.contains(target));
        }
        match &self.available {
            Some(available) => !(available[source] && available[target]),
            None => false,
        }
    }

    fn edge_emphasized(&self, source: NodeIndex, target: NodeIndex, kind: RelationKind) -> bool {
        let Some(selection) = &self.selection else {
            return false;
        };
        if self.category_hidden[source] || self.category_hidden[target] {
            return false;
        }
        kind == RelationKind::Prerequisite
            && selection.contains(source)
            && selection.contains(target)
            && selection.on_prerequisite_side(source)
    }
}

/// Recomputes every node and edge state from scratch.
///
/// `completed` is always reported. Courses outside the active categories are
/// dimmed whatever else applies, and their edges are never emphasized.
/// Courses of an unknown category cannot be toggled off, so the category
/// filter never hides them. With `available_only`, courses that cannot be
/// taken yet are dimmed, unless a course is selected: the selection's
/// prerequisite/dependent closure then decides dimming on its own. Clearing
/// the selection falls back to the category and availability result.
pub fn derive_view(
    graph: &CourseGraph,
    edges: &[LayoutEdge],
    filters: &FilterState,
    completed: &BTreeSet<CourseId>,
) -> DerivedView {
    let stages = Stages::new(graph, filters, completed);

    let nodes = (0..graph.len())
        .map(|idx| {
            let id = graph.id(idx);
            let state = NodeState {
                highlighted: stages.selection.as_ref().map(|s| s.selected) == Some(idx),
                dimmed: stages.node_dimmed(idx),
                completed: completed.contains(id),
            };
            (id.clone(), state)
        })
        .collect();

    let edges = edges
        .iter()
        .filter_map(|edge| {
            let source = graph.index_of(&edge.source)?;
            let target = graph.index_of(&edge.target)?;
            let visibility = if stages.edge_faint(source, target) {
                EdgeVisibility::Faint
            } else {
                EdgeVisibility::Visible
            };
            let state = EdgeState {
                visibility,
                emphasized: stages.edge_emphasized(source, target, edge.kind),
            };
            Some((edge.id.clone(), state))
        })
        .collect();

    DerivedView { nodes, edges }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::core::course::{Category, Course, CourseId};
    use crate::core::department::Department;
    use crate::graph::{build_graph, CourseGraph};
    use crate::layout::{build_layout, Layout, LayoutOptions};
    use crate::view::{
        available_courses, derive_view, CategorySet, DerivedView, EdgeVisibility, FilterState,
    };

    fn id(value: &str) -> CourseId {
        CourseId::new(value)
    }

    fn set(ids: &[&str]) -> BTreeSet<CourseId> {
        ids.iter().map(|value| id(value)).collect()
    }

    // a -> b -> c, a -> e (elective), d unrelated special, l corequisite of b.
    fn fixture() -> (CourseGraph, Layout) {
        let dept = Department::new(
            "cs",
            "CS",
            vec![
                Course::new("a", "A", Category::Base),
                Course::new("b", "B", Category::Base).requires(&["a"]),
                Course::new("c", "C", Category::Specialized).requires(&["b"]),
                Course::new("e", "E", Category::Elective).requires(&["a"]),
                Course::new("d", "D", Category::Special),
                Course::new("l", "L", Category::Base).alongside(&["b"]),
            ],
        );
        let graph = build_graph(&dept);
        let layout = build_layout(&graph, &LayoutOptions::default());
        (graph, layout)
    }

    fn view(filters: &FilterState, completed: &BTreeSet<CourseId>) -> DerivedView {
        let (graph, layout) = fixture();
        derive_view(&graph, &layout.edges, filters, completed)
    }

    fn dimmed(view: &DerivedView) -> Vec<&str> {
        view.nodes
            .iter()
            .filter(|(_, state)| state.dimmed)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    #[test]
    fn no_filters_leave_everything_lit() {
        let result = view(&FilterState::default(), &set(&["a"]));
        assert!(dimmed(&result).is_empty());
        assert!(result.nodes[&id("a")].completed);
        assert!(!result.nodes[&id("b")].completed);
        assert!(result
            .edges
            .values()
            .all(|edge| edge.visibility == EdgeVisibility::Visible && !edge.emphasized));
    }

    #[test]
    fn availability_matches_completed_prerequisites() {
        let dept = Department::new(
            "cs",
            "CS",
            vec![
                Course::new("A", "A", Category::Base),
                Course::new("B", "B", Category::Base).requires(&["A"]),
                Course::new("C", "C", Category::Base).requires(&["A", "D"]),
                Course::new("D", "D", Category::Base),
            ],
        );
        let graph = build_graph(&dept);
        let available = available_courses(&graph, &set(&["A"]));
        assert_eq!(available, vec![id("B"), id("D")]);
    }

    #[test]
    fn selection_highlights_and_dims_outside_closure() {
        let filters = FilterState {
            selected: Some(id("b")),
            ..FilterState::default()
        };
        let result = view(&filters, &BTreeSet::new());
        assert!(result.nodes[&id("b")].highlighted);
        assert!(!result.nodes[&id("a")].highlighted);
        assert_eq!(dimmed(&result), vec!["d", "e", "l"]);

        let ab = result.edge("e-a-b").expect("a->b");
        assert_eq!(ab.visibility, EdgeVisibility::Visible);
        assert!(ab.emphasized, "edge into the selection");
        let bc = result.edge("e-b-c").expect("b->c");
        assert_eq!(bc.visibility, EdgeVisibility::Visible);
        assert!(bc.emphasized, "edge leaving the selection");
        let ae = result.edge("e-a-e").expect("a->e");
        assert_eq!(ae.visibility, EdgeVisibility::Faint);
        assert!(!ae.emphasized);
        let coreq = result.edge("e-coreq-b-l").expect("b~l");
        assert_eq!(coreq.visibility, EdgeVisibility::Faint);
    }

    #[test]
    fn dependent_side_edges_are_not_emphasized() {
        let dept = Department::new(
            "cs",
            "CS",
            vec![
                Course::new("a", "A", Category::Base),
                Course::new("b", "B", Category::Base).requires(&["a"]),
                Course::new("c", "C", Category::Base).requires(&["b"]),
                Course::new("x", "X", Category::Base).requires(&["c"]),
            ],
        );
        let graph = build_graph(&dept);
        let layout = build_layout(&graph, &LayoutOptions::default());
        let filters = FilterState {
            selected: Some(id("b")),
            ..FilterState::default()
        };
        let result = derive_view(&graph, &layout.edges, &filters, &BTreeSet::new());
        assert!(result.edges["e-b-c"].emphasized);
        assert!(!result.edges["e-c-x"].emphasized);
        assert_eq!(result.edges["e-c-x"].visibility, EdgeVisibility::Visible);
    }

    #[test]
    fn category_filter_dims_nodes_and_touching_edges() {
        let mut filters = FilterState::default();
        filters.toggle_category(Category::Elective);
        filters.toggle_category(Category::Special);
        let result = view(&filters, &BTreeSet::new());
        assert_eq!(dimmed(&result), vec!["d", "e"]);
        assert_eq!(result.edges["e-a-e"].visibility, EdgeVisibility::Faint);
        assert_eq!(result.edges["e-a-b"].visibility, EdgeVisibility::Visible);
    }

    #[test]
    fn category_hidden_stays_dimmed_inside_selection() {
        let filters = FilterState {
            selected: Some(id("b")),
            categories: CategorySet::only(Category::Base),
            available_only: false,
        };
        let result = view(&filters, &BTreeSet::new());
        assert!(result.nodes[&id("c")].dimmed, "specialized course is filtered out");
        assert_eq!(result.edges["e-b-c"].visibility, EdgeVisibility::Faint);
        assert!(!result.edges["e-b-c"].emphasized, "hidden edge is not emphasized");
        assert!(result.edges["e-a-b"].emphasized);
        assert!(!result.nodes[&id("a")].dimmed);
    }

    #[test]
    fn unknown_category_is_never_filtered_out() {
        let dept = Department::new(
            "cs",
            "CS",
            vec![
                Course::new("x", "X", Category::Unknown),
                Course::new("y", "Y", Category::Base).requires(&["x"]),
            ],
        );
        let graph = build_graph(&dept);
        let layout = build_layout(&graph, &LayoutOptions::default());
        let filters = FilterState {
            categories: CategorySet::only(Category::Specialized),
            ..FilterState::default()
        };
        let result = derive_view(&graph, &layout.edges, &filters, &BTreeSet::new());
        assert!(!result.nodes[&id("x")].dimmed);
        assert!(result.nodes[&id("y")].dimmed);
    }

    #[test]
    fn availability_mode_dims_locked_and_completed_courses() {
        let filters = FilterState {
            available_only: true,
            ..FilterState::default()
        };
        let result = view(&filters, &set(&["a"]));
        // b, e are unlocked by a; d and l have no prerequisites.
        assert_eq!(dimmed(&result), vec!["a", "c"]);
        assert!(result.nodes[&id("a")].completed);
        assert_eq!(result.edges["e-a-b"].visibility, EdgeVisibility::Faint);
        assert_eq!(result.edges["e-coreq-b-l"].visibility, EdgeVisibility::Visible);
    }

    #[test]
    fn selection_supersedes_availability_and_clearing_restores_it() {
        let mut filters = FilterState {
            available_only: true,
            ..FilterState::default()
        };
        filters.select(id("c"));
        let selected = view(&filters, &set(&["a"]));
        assert_eq!(dimmed(&selected), vec!["d", "e", "l"]);
        assert!(!selected.nodes[&id("a")].dimmed);

        filters.clear_selection();
        let cleared = view(&filters, &set(&["a"]));
        let fresh = view(
            &FilterState {
                available_only: true,
                ..FilterState::default()
            },
            &set(&["a"]),
        );
        assert_eq!(cleared, fresh);
        assert_eq!(dimmed(&cleared), vec!["a", "c"]);
    }

    #[test]
    fn unknown_selection_is_ignored() {
        let filters = FilterState {
            selected: Some(id("ghost")),
            ..FilterState::default()
        };
        let result = view(&filters, &BTreeSet::new());
        assert!(dimmed(&result).is_empty());
        assert!(result.nodes.values().all(|state| !state.highlighted));
    }
}
