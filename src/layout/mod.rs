use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::course::{Category, Course, CourseId, RelationKind};
use crate::core::department::Department;
use crate::graph::ops::depths;
use crate::graph::{build_graph, CourseGraph, NodeIndex};

pub mod collate;

pub use collate::compare_names;

/// Grid metrics in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub node_width: f64,
    pub node_height: f64,
    pub gap_x: f64,
    pub gap_y: f64,
    pub sub_gap_y: f64,
    pub max_columns: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            node_width: 152.0,
            node_height: 48.0,
            gap_x: 18.0,
            gap_y: 72.0,
            sub_gap_y: 28.0,
            max_columns: 9,
        }
    }
}

impl LayoutOptions {
    fn columns(&self) -> usize {
        self.max_columns.max(1)
    }

    fn row_width(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        count as f64 * self.node_width + (count - 1) as f64 * self.gap_x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: CourseId,
    pub name: String,
    pub category: Category,
    pub credits: u32,
    pub layer: usize,
    pub position: Position,
}

/// Static stroke of an edge before any view state is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeWeight {
    Standard,
    Elective,
    Corequisite,
}

impl EdgeWeight {
    pub fn stroke_width(self) -> f64 {
        match self {
            EdgeWeight::Standard => 1.2,
            EdgeWeight::Elective => 0.8,
            EdgeWeight::Corequisite => 1.0,
        }
    }

    pub fn opacity(self) -> f64 {
        match self {
            EdgeWeight::Standard => 0.25,
            EdgeWeight::Elective => 0.18,
            EdgeWeight::Corequisite => 0.25,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            EdgeWeight::Standard => "#94a3b8",
            EdgeWeight::Elective => "#f59e0b",
            EdgeWeight::Corequisite => "#22c55e",
        }
    }

    pub fn dashed(self) -> bool {
        matches!(self, EdgeWeight::Corequisite)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: CourseId,
    pub target: CourseId,
    pub kind: RelationKind,
    pub weight: EdgeWeight,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn node(&self, id: &CourseId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// Course ids of every layer, top to bottom.
    pub fn layers(&self) -> Vec<Vec<&CourseId>> {
        let count = self.nodes.iter().map(|node| node.layer + 1).max().unwrap_or(0);
        let mut layers: Vec<Vec<&CourseId>> = vec![Vec::new(); count];
        for node in &self.nodes {
            layers[node.layer].push(&node.id);
        }
        layers.retain(|layer| !layer.is_empty());
        layers
    }
}

pub fn layout(department: &Department) -> Layout {
    let graph = build_graph(department);
    build_layout(&graph, &LayoutOptions::default())
}

/// Layered grid layout of a department's courses.
///
/// Connected courses are grouped by prerequisite depth, isolated courses form
/// one trailing layer. Each layer is sorted by category rank then name and
/// wraps into sub-rows of at most `max_columns` nodes, every sub-row centred
/// on the widest one. The result depends only on the set of courses, not on
/// their input order.
pub fn build_layout(graph: &CourseGraph, options: &LayoutOptions) -> Layout {
    let depths = depths(graph);

    let (isolated, connected): (Vec<NodeIndex>, Vec<NodeIndex>) =
        (0..graph.len()).partition(|&idx| graph.is_isolated_index(idx));

    let max_depth = connected.iter().map(|&idx| depths[idx]).max().unwrap_or(0);
    let mut levels: Vec<Vec<NodeIndex>> = vec![Vec::new(); max_depth + 1];
    for &idx in &connected {
        levels[depths[idx]].push(idx);
    }
    if !isolated.is_empty() {
        levels.push(isolated);
    }
    for level in &mut levels {
        level.sort_by(|&a, &b| layer_order(graph.course(a), graph.course(b)));
    }

    let columns = options.columns();
    let max_row_width = levels
        .iter()
        .map(|level| options.row_width(level.len().min(columns)))
        .fold(0.0_f64, f64::max);

    let mut nodes = Vec::with_capacity(graph.len());
    let mut y = 0.0;
    for (layer, level) in levels.iter().enumerate() {
        if level.is_empty() {
            continue;
        }
        let sub_rows: Vec<&[NodeIndex]> = level.chunks(columns).collect();
        for (row, courses) in sub_rows.iter().enumerate() {
            let offset_x = (max_row_width - options.row_width(courses.len())) / 2.0;
            for (col, &idx) in courses.iter().enumerate() {
                let course = graph.course(idx);
                nodes.push(LayoutNode {
                    id: course.id.clone(),
                    name: course.name.clone(),
                    category: course.category,
                    credits: course.credits,
                    layer,
                    position: Position {
                        x: offset_x + col as f64 * (options.node_width + options.gap_x),
                        y,
                    },
                });
            }
            y += options.node_height;
            if row + 1 < sub_rows.len() {
                y += options.sub_gap_y;
            }
        }
        y += options.gap_y;
    }

    let edges = build_edges(graph);
    let height = if nodes.is_empty() { 0.0 } else { y - options.gap_y };

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        layers = levels.len(),
        "computed layout"
    );

    Layout {
        nodes,
        edges,
        width: max_row_width,
        height,
    }
}

/// Category rank, then name, then id.
pub fn layer_order(a: &Course, b: &Course) -> Ordering {
    a.category
        .rank()
        .cmp(&b.category.rank())
        .then_with(|| compare_names(&a.name, &b.name))
        .then_with(|| a.id.cmp(&b.id))
}

fn build_edges(graph: &CourseGraph) -> Vec<LayoutEdge> {
    let mut edges = Vec::new();
    for idx in 0..graph.len() {
        let course = graph.course(idx);
        let weight = if course.category == Category::Elective {
            EdgeWeight::Elective
        } else {
            EdgeWeight::Standard
        };
        for &pre in graph.prerequisite_indices(idx) {
            let source = graph.id(pre);
            edges.push(LayoutEdge {
                id: format!("e-{}-{}", source, course.id),
                source: source.clone(),
                target: course.id.clone(),
                kind: RelationKind::Prerequisite,
                weight,
            });
        }
        for &partner in graph.corequisite_indices(idx) {
            let source = graph.id(partner);
            edges.push(LayoutEdge {
                id: format!("e-coreq-{}-{}", source, course.id),
                source: source.clone(),
                target: course.id.clone(),
                kind: RelationKind::Corequisite,
                weight: EdgeWeight::Corequisite,
            });
        }
    }
    edges
}
