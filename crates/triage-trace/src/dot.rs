use crate::{Graph, LayoutConfig, Node, edge_style, node_style};
use graphviz_rust::dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph as DotGraph, Id, Node as DotNode, NodeId, Stmt,
    Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};

/// Renders the compiled graph as a DOT digraph with pinned positions, for
/// `neato -n` style rendering outside the web client.
pub fn to_dot(graph: &Graph, layout: &LayoutConfig) -> String {
    to_dot_graph(graph, layout).print(&mut PrinterContext::default())
}

pub fn to_dot_graph(graph: &Graph, layout: &LayoutConfig) -> DotGraph {
    let mut stmts = vec![Stmt::Attribute(attr("rankdir", plain("TB")))];

    for node in &graph.nodes {
        stmts.push(Stmt::Node(dot_node(node, layout)));
    }

    for edge in &graph.edges {
        let style = edge_style(edge, graph.node(&edge.target).map(|node| node.kind));
        stmts.push(Stmt::Edge(DotEdge {
            ty: EdgeTy::Pair(vertex(&edge.source), vertex(&edge.target)),
            attributes: vec![
                attr("id", quoted(&edge.id)),
                attr("penwidth", plain(&style.stroke_width.to_string())),
                attr("style", plain(if edge.emphasized { "bold" } else { "solid" })),
            ],
        }));
    }

    DotGraph::DiGraph {
        id: Id::Plain("trace".to_string()),
        strict: false,
        stmts,
    }
}

fn dot_node(node: &Node, layout: &LayoutConfig) -> DotNode {
    let style = node_style(node.kind, layout);
    // DOT's y axis points up.
    let pos = format!("{},{}!", node.position.x, -node.position.y);
    DotNode {
        id: NodeId(quoted(&node.id), None),
        attributes: vec![
            attr("label", quoted(&node.payload.text_lines().join("\n"))),
            attr("kind", plain(node.kind.as_str())),
            attr("shape", plain("box")),
            attr("style", quoted("rounded,filled")),
            attr("fillcolor", quoted(style.accent)),
            attr("pos", quoted(&pos)),
        ],
    }
}

fn attr(key: &str, value: Id) -> Attribute {
    Attribute(Id::Plain(key.to_string()), value)
}

fn vertex(id: &str) -> Vertex {
    Vertex::N(NodeId(quoted(id), None))
}

fn plain(value: &str) -> Id {
    Id::Plain(value.to_string())
}

fn quoted(value: &str) -> Id {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped.push('"');
    Id::Escaped(escaped)
}
