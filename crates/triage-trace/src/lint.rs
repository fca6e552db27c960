use crate::{Diagnostic, Graph, NodeKind, ValidationError};
use std::collections::{BTreeMap, BTreeSet};

/// A check supplied by the caller on top of the built-in rules.
pub trait LintRule {
    fn name(&self) -> &str;
    fn check(&self, graph: &Graph) -> Vec<Diagnostic>;
}

type BuiltinRule = fn(&Graph) -> Vec<Diagnostic>;

const BUILTIN_RULES: [BuiltinRule; 7] = [
    rule_edge_endpoints_exist,
    rule_unique_ids,
    rule_stage_singletons,
    rule_score_inbound,
    rule_score_outbound,
    rule_edge_emphasis,
    rule_stage_order,
];

/// Checks a compiled graph against the structural contract the renderer
/// relies on. An empty graph is always valid.
pub fn validate(graph: &Graph, extra_rules: &[&dyn LintRule]) -> Vec<Diagnostic> {
    BUILTIN_RULES
        .iter()
        .flat_map(|rule| rule(graph))
        .chain(extra_rules.iter().flat_map(|rule| rule.check(graph)))
        .collect()
}

/// Like [`validate`], but any error-level finding becomes a [`ValidationError`].
pub fn validate_or_raise(
    graph: &Graph,
    extra_rules: &[&dyn LintRule],
) -> Result<Vec<Diagnostic>, ValidationError> {
    ValidationError::raise_on_errors(validate(graph, extra_rules))
}

fn rule_edge_endpoints_exist(graph: &Graph) -> Vec<Diagnostic> {
    let ids: BTreeSet<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    let mut diagnostics = Vec::new();
    for edge in &graph.edges {
        for (end, id) in [("source", &edge.source), ("target", &edge.target)] {
            if !ids.contains(id.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "edge_endpoints_exist",
                        format!("edge {end} '{id}' does not exist"),
                    )
                    .on_edge(&edge.id),
                );
            }
        }
    }
    diagnostics
}

fn rule_unique_ids(graph: &Graph) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let mut seen = BTreeSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            diagnostics.push(
                Diagnostic::error("unique_ids", "duplicate node id").on_node(&node.id),
            );
        }
    }

    let mut seen = BTreeSet::new();
    for edge in &graph.edges {
        if !seen.insert(edge.id.as_str()) {
            diagnostics.push(
                Diagnostic::error("unique_ids", "duplicate edge id").on_edge(&edge.id),
            );
        }
    }

    diagnostics
}

fn rule_stage_singletons(graph: &Graph) -> Vec<Diagnostic> {
    let groups: [(&str, &[NodeKind]); 3] = [
        ("start", &[NodeKind::Start][..]),
        ("alarm stage", &[NodeKind::Alarm, NodeKind::NoAlarm][..]),
        ("final", &[NodeKind::Final][..]),
    ];

    groups
        .into_iter()
        .filter_map(|(label, kinds)| {
            let count = graph
                .nodes
                .iter()
                .filter(|node| kinds.contains(&node.kind))
                .count();
            (count > 1).then(|| {
                Diagnostic::error(
                    "stage_singletons",
                    format!("graph must have at most one {label} node; found {count}"),
                )
            })
        })
        .collect()
}

fn rule_score_inbound(graph: &Graph) -> Vec<Diagnostic> {
    let alarm_stage = graph.alarm_stage_node().map(|node| node.id.as_str());
    let mut diagnostics = Vec::new();

    for score in graph.nodes_of_kind(NodeKind::Score) {
        let inbound: Vec<_> = graph.incoming_edges(&score.id).collect();
        let ok = match alarm_stage {
            Some(stage_id) => inbound.len() == 1 && inbound[0].source == stage_id,
            None => inbound.is_empty(),
        };
        if !ok {
            let expected = match alarm_stage {
                Some(stage_id) => format!("exactly one inbound edge from '{stage_id}'"),
                None => "no inbound edges without an alarm stage".to_string(),
            };
            diagnostics.push(
                Diagnostic::error(
                    "score_inbound",
                    format!("score node has {} inbound edge(s); expected {expected}", inbound.len()),
                )
                .on_node(&score.id),
            );
        }
    }

    diagnostics
}

fn rule_score_outbound(graph: &Graph) -> Vec<Diagnostic> {
    let final_id = graph
        .nodes_of_kind(NodeKind::Final)
        .next()
        .map(|node| node.id.as_str());
    let mut diagnostics = Vec::new();

    for score in graph.nodes_of_kind(NodeKind::Score) {
        let outbound: Vec<_> = graph.outgoing_edges(&score.id).collect();
        let ok = match final_id {
            Some(final_id) => outbound.len() == 1 && outbound[0].target == final_id,
            None => outbound.is_empty(),
        };
        if !ok {
            diagnostics.push(
                Diagnostic::error(
                    "score_outbound",
                    format!(
                        "score node has {} outbound edge(s); expected {}",
                        outbound.len(),
                        if final_id.is_some() { "exactly one into the final node" } else { "none" }
                    ),
                )
                .on_node(&score.id),
            );
        }
    }

    diagnostics
}

fn rule_edge_emphasis(graph: &Graph) -> Vec<Diagnostic> {
    let kinds: BTreeMap<&str, NodeKind> = graph
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node.kind))
        .collect();

    graph
        .edges
        .iter()
        .filter_map(|edge| {
            let target = *kinds.get(edge.target.as_str())?;
            let expected = matches!(target, NodeKind::Alarm | NodeKind::Final);
            (edge.emphasized != expected).then(|| {
                Diagnostic::warning(
                    "edge_emphasis",
                    format!(
                        "edge into {} node should{} be emphasized",
                        target.as_str(),
                        if expected { "" } else { " not" }
                    ),
                )
                .on_edge(&edge.id)
            })
        })
        .collect()
}

fn stage_rank(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Start => 0,
        NodeKind::Alarm | NodeKind::NoAlarm => 1,
        NodeKind::Score => 2,
        NodeKind::Final => 3,
    }
}

fn rule_stage_order(graph: &Graph) -> Vec<Diagnostic> {
    let mut bands: BTreeMap<u8, (i64, i64)> = BTreeMap::new();
    for node in &graph.nodes {
        let y = node.position.y;
        bands
            .entry(stage_rank(node.kind))
            .and_modify(|(min, max)| {
                *min = (*min).min(y);
                *max = (*max).max(y);
            })
            .or_insert((y, y));
    }

    let ranked: Vec<_> = bands.into_iter().collect();
    ranked
        .windows(2)
        .filter(|pair| pair[0].1.1 >= pair[1].1.0)
        .map(|pair| {
            Diagnostic::warning(
                "stage_order",
                format!(
                    "stage band {} overlaps or sits below stage band {}",
                    pair[0].0, pair[1].0
                ),
            )
            .hint("stack stage bands top to bottom: start, alarm, scores, final")
        })
        .collect()
}
