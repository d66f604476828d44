//! Graphviz DOT export.
//!
//! Produces the data an external renderer needs: every node with a shape for
//! its kind, every link with its display label. Rendering the DOT text to an
//! image is left to graphviz or whatever tool the caller prefers.

use std::fmt::Write;

use crate::node::NodeType;
use crate::topology::Topology;

fn shape_for(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Host => "ellipse",
        NodeType::Switch => "box",
        NodeType::Router => "diamond",
    }
}

/// Render the topology as an undirected Graphviz DOT graph
pub fn to_dot(topology: &Topology) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "graph \"{}\" {{", topology.name());
    for (name, node) in topology.nodes() {
        let _ = writeln!(
            out,
            "    \"{}\" [shape={}];",
            name,
            shape_for(node.node_type())
        );
    }
    for (pair, link) in topology.links() {
        let _ = writeln!(
            out,
            "    \"{}\" -- \"{}\" [label=\"{}\"];",
            pair.first(),
            pair.second(),
            link.label()
        );
    }
    out.push_str("}\n");
    out
}
