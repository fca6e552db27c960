//! Property tests over generated traces.

use proptest::prelude::*;
use std::collections::BTreeSet;
use triage_trace::{Dialect, Graph, NodeKind, TraceCompiler, compile_trace, validate};

#[derive(Clone, Debug)]
struct TraceShape {
    dialect: Dialect,
    start: bool,
    alarm_header: bool,
    /// Rule name and whether its activation line carries the `->` arrow.
    rules: Vec<(String, bool)>,
    /// Alarm and final markers written in the other dialect.
    mixed: bool,
    scores: Vec<(String, i64, i64)>,
    fever: Option<(usize, u32, i64)>,
    final_tally: Option<(i64, i64)>,
}

fn signed(value: i64) -> String {
    if value > 0 { format!("+{value}") } else { value.to_string() }
}

impl TraceShape {
    fn render(&self) -> String {
        let english = self.dialect == Dialect::English;
        let stage_english = english != self.mixed;
        let mut lines = Vec::new();

        if self.start {
            lines.push(if english {
                "--- START Hybrid Diagnosis V2 ---".to_string()
            } else {
                "--- INICIO Diagnóstico Híbrido V2 ---".to_string()
            });
        }
        lines.push("noise line".to_string());
        if self.alarm_header {
            lines.push(if stage_english {
                "[1] Evaluating alarm signs...".to_string()
            } else {
                "[1] Evaluando signos de alarma...".to_string()
            });
            for (rule, arrow) in &self.rules {
                let marker = if stage_english { "ALARM ACTIVATED" } else { "ALARMA ACTIVADA" };
                lines.push(if *arrow {
                    format!("⚠️ {marker}: {rule} -> refer")
                } else {
                    format!("⚠️ {marker}: {rule}")
                });
            }
        }

        let fever_line = self.fever.map(|(label, tenths, dengue)| {
            let labels = if english {
                ["High Fever", "Hyperpyrexia", "Low-Grade Fever"]
            } else {
                ["Fiebre Alta", "Hiperpirexia", "Febrícula"]
            };
            format!(
                "{} ({}.{}°C): Dengue({})",
                labels[label % 3],
                tenths / 10,
                tenths % 10,
                signed(dengue)
            )
        });
        let fever_at = self.fever.map(|(label, _, _)| label % (self.scores.len() + 1));

        for (index, (symptom, covid, dengue)) in self.scores.iter().enumerate() {
            if fever_at == Some(index) {
                lines.extend(fever_line.clone());
            }
            lines.push(format!(
                "-> {symptom}: COVID({}) | Dengue({})",
                signed(*covid),
                signed(*dengue)
            ));
        }
        if fever_at == Some(self.scores.len()) {
            lines.extend(fever_line);
        }

        if let Some((dengue, covid)) = self.final_tally {
            lines.push(if stage_english {
                format!("[FINAL SCORES] Dengue: {dengue} | COVID: {covid}")
            } else {
                format!("[SCORES FINALES] Dengue: {dengue} | COVID: {covid}")
            });
        }
        lines.join("\n")
    }

    fn named_rules(&self) -> Vec<String> {
        self.rules
            .iter()
            .filter(|(_, arrow)| *arrow)
            .map(|(rule, _)| rule.clone())
            .collect()
    }

    fn score_count(&self) -> usize {
        self.scores.len() + usize::from(self.fever.is_some())
    }
}

fn trace_shape() -> impl Strategy<Value = TraceShape> {
    (
        prop_oneof![Just(Dialect::Spanish), Just(Dialect::English)],
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(("[a-z_][a-z_:]{0,11}", any::<bool>()), 0..3),
        prop::collection::vec(("[a-z][a-z ]{0,10}", -5i64..6, -5i64..6), 0..6),
        prop::option::of((0usize..6, 365u32..425, -3i64..4)),
        prop::option::of((-20i64..30, -20i64..30)),
        any::<bool>(),
    )
        .prop_map(
            |(dialect, start, alarm_header, rules, scores, fever, final_tally, mixed)| TraceShape {
                dialect,
                start,
                alarm_header,
                rules,
                mixed,
                scores,
                fever,
                final_tally,
            },
        )
}

/// Shapes that reach every stage: header, at least one score, final tally.
fn full_pipeline_shape() -> impl Strategy<Value = TraceShape> {
    trace_shape().prop_map(|mut shape| {
        shape.alarm_header = true;
        shape.final_tally.get_or_insert((0, 0));
        if shape.score_count() == 0 {
            shape.scores.push(("tos".to_string(), 1, 0));
        }
        shape
    })
}

fn count_kind(graph: &Graph, kind: NodeKind) -> usize {
    graph.nodes_of_kind(kind).count()
}

proptest! {
    #[test]
    fn compile_trace_twice_expected_identical_output(shape in trace_shape()) {
        let trace = shape.render();
        let first = compile_trace(&trace).to_json().expect("graph should serialize");
        let second = compile_trace(&trace).to_json().expect("graph should serialize");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn compile_trace_generated_expected_contract_holds(shape in trace_shape()) {
        let graph = compile_trace(&shape.render());
        let diagnostics = validate(&graph, &[]);
        prop_assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics);

        prop_assert_eq!(count_kind(&graph, NodeKind::Start), usize::from(shape.start));
        prop_assert_eq!(
            count_kind(&graph, NodeKind::Alarm),
            usize::from(shape.alarm_header && !shape.rules.is_empty())
        );
        prop_assert_eq!(
            count_kind(&graph, NodeKind::NoAlarm),
            usize::from(shape.alarm_header && shape.rules.is_empty())
        );
        prop_assert_eq!(count_kind(&graph, NodeKind::Score), shape.score_count());
        prop_assert_eq!(count_kind(&graph, NodeKind::Final), usize::from(shape.final_tally.is_some()));
    }

    #[test]
    fn compile_trace_activation_lines_expected_names_only_from_arrowed_lines(
        shape in trace_shape().prop_map(|mut shape| { shape.alarm_header = true; shape })
    ) {
        let records = TraceCompiler::default().records(&shape.render());
        let alarm = records.alarm.expect("alarm record should exist");
        prop_assert_eq!(alarm.activated, !shape.rules.is_empty());
        prop_assert_eq!(alarm.triggered_rule_names, shape.named_rules());
    }

    #[test]
    fn compile_trace_full_pipeline_expected_score_fan_in_and_fan_out(shape in full_pipeline_shape()) {
        let graph = compile_trace(&shape.render());

        let stage = graph.alarm_stage_node().expect("alarm stage node should exist");
        let sources: BTreeSet<_> = graph
            .incoming_edges("final-scores")
            .map(|edge| edge.source.clone())
            .collect();
        prop_assert_eq!(graph.incoming_edges("final-scores").count(), shape.score_count());
        prop_assert_eq!(sources.len(), shape.score_count());

        for score in graph.nodes_of_kind(NodeKind::Score) {
            let inbound: Vec<_> = graph.incoming_edges(&score.id).collect();
            prop_assert_eq!(inbound.len(), 1);
            prop_assert_eq!(&inbound[0].source, &stage.id);
            prop_assert!(sources.contains(&score.id));
        }
    }

    #[test]
    fn compile_trace_start_line_expected_dialect_on_records(
        shape in trace_shape().prop_map(|mut shape| { shape.start = true; shape })
    ) {
        let records = TraceCompiler::default().records(&shape.render());
        prop_assert_eq!(records.start.map(|s| s.language), Some(shape.dialect));
        if shape.final_tally.is_some() {
            prop_assert_eq!(records.final_tally.map(|f| f.language), Some(shape.dialect));
        }
    }

    #[test]
    fn compile_trace_markerless_text_expected_empty_graph(text in "[a-z0-9 \n.,:|()]{0,300}") {
        prop_assert!(compile_trace(&text).is_empty());
    }

    #[test]
    fn compile_trace_arbitrary_text_expected_valid_graph(text in any::<String>()) {
        let graph = compile_trace(&text);
        prop_assert!(!validate(&graph, &[]).iter().any(|d| d.is_error()));
    }

    #[test]
    fn compile_bytes_arbitrary_bytes_expected_no_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let graph = TraceCompiler::default().compile_bytes(&bytes);
        prop_assert!(!validate(&graph, &[]).iter().any(|d| d.is_error()));
    }
}
