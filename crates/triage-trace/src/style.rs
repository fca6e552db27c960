use crate::{Edge, Graph, LayoutConfig, NodeKind};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub fill: &'static str,
    pub border: &'static str,
    /// Solid color for minimaps and DOT output.
    pub accent: &'static str,
    pub width: i64,
    pub border_width: u32,
    pub radius: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeStyle {
    pub stroke: &'static str,
    pub stroke_width: u32,
    pub animated: bool,
}

pub fn node_style(kind: NodeKind, layout: &LayoutConfig) -> NodeStyle {
    match kind {
        NodeKind::Start => NodeStyle {
            fill: "rgba(34, 197, 94, 0.2)",
            border: "rgba(34, 197, 94, 0.5)",
            accent: "#22c55e",
            width: 200,
            border_width: 2,
            radius: 12,
        },
        NodeKind::Alarm => NodeStyle {
            fill: "rgba(239, 68, 68, 0.2)",
            border: "rgba(239, 68, 68, 0.5)",
            accent: "#ef4444",
            width: 220,
            border_width: 2,
            radius: 12,
        },
        NodeKind::NoAlarm => NodeStyle {
            fill: "rgba(241, 245, 249, 0.8)",
            border: "rgba(203, 213, 225, 0.6)",
            accent: "#9ca3af",
            width: 180,
            border_width: 2,
            radius: 12,
        },
        NodeKind::Score => NodeStyle {
            fill: "rgba(59, 130, 246, 0.15)",
            border: "rgba(59, 130, 246, 0.4)",
            accent: "#3b82f6",
            width: layout.score_node_width,
            border_width: 2,
            radius: 12,
        },
        NodeKind::Final => NodeStyle {
            fill: "rgba(245, 158, 11, 0.2)",
            border: "rgba(245, 158, 11, 0.5)",
            accent: "#f59e0b",
            width: 280,
            border_width: 3,
            radius: 16,
        },
    }
}

/// Emphasis picks the stroke weight; the target kind picks the color.
pub fn edge_style(edge: &Edge, target: Option<NodeKind>) -> EdgeStyle {
    match (edge.emphasized, target) {
        (true, Some(NodeKind::Alarm)) => EdgeStyle {
            stroke: "rgba(239, 68, 68, 0.6)",
            stroke_width: 3,
            animated: true,
        },
        (true, _) => EdgeStyle {
            stroke: "rgba(245, 158, 11, 0.6)",
            stroke_width: 2,
            animated: true,
        },
        (false, Some(NodeKind::NoAlarm)) => EdgeStyle {
            stroke: "rgba(100, 116, 139, 0.5)",
            stroke_width: 1,
            animated: false,
        },
        (false, _) => EdgeStyle {
            stroke: "rgba(100, 116, 139, 0.4)",
            stroke_width: 1,
            animated: false,
        },
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StyledNode<'a> {
    #[serde(flatten)]
    pub node: &'a crate::Node,
    pub style: NodeStyle,
}

#[derive(Clone, Debug, Serialize)]
pub struct StyledEdge<'a> {
    #[serde(flatten)]
    pub edge: &'a Edge,
    pub style: EdgeStyle,
}

/// Graph plus resolved presentation styles, for renderers that do not carry
/// their own theme.
#[derive(Clone, Debug, Serialize)]
pub struct StyledGraph<'a> {
    pub nodes: Vec<StyledNode<'a>>,
    pub edges: Vec<StyledEdge<'a>>,
}

impl<'a> StyledGraph<'a> {
    pub fn new(graph: &'a Graph, layout: &LayoutConfig) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|node| StyledNode {
                node,
                style: node_style(node.kind, layout),
            })
            .collect();
        let edges = graph
            .edges
            .iter()
            .map(|edge| StyledEdge {
                edge,
                style: edge_style(edge, graph.node(&edge.target).map(|node| node.kind)),
            })
            .collect();
        Self { nodes, edges }
    }
}
