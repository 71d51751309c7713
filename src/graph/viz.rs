use crate::layout::{EdgeWeight, Layout};

/// Graphviz rendering with every node pinned at its layout position.
///
/// Layout y grows downwards, so it is flipped for Graphviz. Positions are
/// emitted in points; render with `neato -n` to keep them.
pub fn render_dot(name: &str, layout: &Layout) -> String {
    let mut out = format!("digraph \"{}\" {{\n", escape_dot_label(name));
    out.push_str("  node [shape=box, style=rounded];\n");
    for node in &layout.nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", pos=\"{},{}!\", group=\"{}\"];\n",
            escape_dot_label(node.id.as_str()),
            escape_dot_label(&node.name),
            format_coord(node.position.x),
            format_coord(layout.height - node.position.y),
            node.category,
        ));
    }
    for edge in &layout.edges {
        let mut attrs = vec![
            format!("color=\"{}\"", edge.weight.color()),
            format!("penwidth={}", edge.weight.stroke_width()),
        ];
        if edge.weight.dashed() {
            attrs.push("style=dashed".to_string());
            attrs.push("arrowhead=none".to_string());
        }
        if edge.weight == EdgeWeight::Elective {
            attrs.push("arrowsize=0.6".to_string());
        }
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [{}];\n",
            escape_dot_label(edge.source.as_str()),
            escape_dot_label(edge.target.as_str()),
            attrs.join(", ")
        ));
    }
    out.push_str("}\n");
    out
}

/// One line per layer: `layer N:` followed by the indented course labels.
pub fn render_layers(layout: &Layout) -> String {
    let mut out = String::new();
    for (idx, layer) in layout.layers().iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!("layer {}:\n", idx));
        for id in layer {
            let label = layout
                .node(id)
                .map(|node| format!("{} ({}, {})", node.name, id, node.category))
                .unwrap_or_else(|| id.to_string());
            out.push_str("  ");
            out.push_str(&label);
            out.push('\n');
        }
    }
    out
}

fn format_coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
