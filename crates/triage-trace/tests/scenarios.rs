use triage_trace::{
    Dialect, LayoutConfig, NodeKind, Position, TraceCompiler, compile_response, compile_trace,
    validate_or_raise,
};

const SPANISH_TRACE: &str = "\
--- INICIO Diagnóstico Híbrido V2 ---
Síntomas recibidos: tos, mialgia, fiebre
[1] Evaluando signos de alarma...
⚠️ ALARMA ACTIVADA: fiebre_alta -> Derivación inmediata
[2] Calculando scores por síntoma...
-> Tos: COVID(+2) | Dengue(0)
-> Mialgia: COVID(0) | Dengue(+3)
[SCORES FINALES] Dengue: 3 | COVID: 2
";

const ENGLISH_TRACE: &str = "\
--- START Hybrid Diagnosis V2 ---
[1] Evaluating alarm signs...
  No alarm signs detected.
[2] Computing symptom scores...
-> Cough: COVID(+2) | Dengue(-1)
High Fever (39.2°C): Dengue(+2)
-> Rash: COVID(0) | Dengue(+2)
[FINAL SCORES] Dengue: 3 | COVID: 2
";

fn ids<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    items.collect()
}

#[test]
fn compile_trace_full_spanish_trace_expected_five_nodes_and_five_edges() {
    let graph = compile_trace(SPANISH_TRACE);

    assert_eq!(
        ids(graph.nodes.iter().map(|n| n.id.as_str())),
        vec!["start", "alarm", "score-0", "score-1", "final-scores"]
    );
    let kinds: Vec<_> = graph.nodes.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Start,
            NodeKind::Alarm,
            NodeKind::Score,
            NodeKind::Score,
            NodeKind::Final
        ]
    );

    let edges: Vec<_> = graph
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.emphasized))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("start", "alarm", true),
            ("alarm", "score-0", false),
            ("alarm", "score-1", false),
            ("score-0", "final-scores", true),
            ("score-1", "final-scores", true),
        ]
    );

    let positions: Vec<_> = graph.nodes.iter().map(|n| n.position).collect();
    assert_eq!(
        positions,
        vec![
            Position::new(400, 0),
            Position::new(400, 120),
            Position::new(130, 240),
            Position::new(410, 240),
            Position::new(400, 360),
        ]
    );

    let alarm = graph.node("alarm").expect("alarm node should exist");
    assert_eq!(alarm.payload.title, "⚠️ Signos de Alarma");
    assert_eq!(alarm.payload.items, vec!["fiebre_alta".to_string()]);

    let final_node = graph.node("final-scores").expect("final node should exist");
    assert_eq!(final_node.payload.title, "📊 Scores Finales");
    assert_eq!(final_node.payload.text_lines().last().map(String::as_str), Some("Dengue: 3 | COVID: 2"));

    validate_or_raise(&graph, &[]).expect("compiled graph should satisfy the contract");
}

#[test]
fn compile_trace_alarm_header_without_activations_expected_no_alarm_node() {
    let graph = compile_trace(ENGLISH_TRACE);

    assert!(graph.node("alarm").is_none());
    let no_alarm = graph.node("no-alarm").expect("no-alarm node should exist");
    assert_eq!(no_alarm.kind, NodeKind::NoAlarm);
    assert_eq!(no_alarm.payload.title, "✅ No Alarms");
    assert_eq!(no_alarm.payload.subtitle.as_deref(), Some("Normal evaluation"));

    let from_no_alarm: Vec<_> = graph.outgoing_edges("no-alarm").collect();
    assert_eq!(from_no_alarm.len(), 3);
    assert!(from_no_alarm.iter().all(|edge| !edge.emphasized));

    let start_edge = graph
        .incoming_edges("no-alarm")
        .next()
        .expect("start should feed the no-alarm node");
    assert!(!start_edge.emphasized);
}

#[test]
fn compile_trace_fever_line_expected_score_after_symptoms() {
    let graph = compile_trace(ENGLISH_TRACE);

    let titles: Vec<_> = graph
        .nodes_of_kind(NodeKind::Score)
        .map(|n| n.payload.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Cough", "Rash", "High Fever (39.2°C)"]);

    let fever = graph.node("score-2").expect("fever score node should exist");
    assert_eq!(
        fever.payload.text_lines().last().map(String::as_str),
        Some("COVID: 0 | Dengue: +2")
    );
}

#[test]
fn compile_trace_empty_input_expected_empty_graph() {
    let graph = compile_trace("");
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
    assert_eq!(
        graph.to_json().expect("graph should serialize"),
        r#"{"nodes":[],"edges":[]}"#
    );
}

#[test]
fn compile_trace_start_and_final_only_expected_two_unconnected_nodes() {
    let graph = compile_trace("--- START\n[FINAL SCORES] Dengue: 0 | COVID: 1");

    assert_eq!(graph.nodes.len(), 2);
    assert!(graph.edges.is_empty());
    assert_eq!(graph.nodes[1].position, Position::new(400, 120));
}

#[test]
fn compile_trace_language_inference_expected_matching_start_and_final() {
    let compiler = TraceCompiler::default();

    let english = compiler.records(ENGLISH_TRACE);
    assert_eq!(english.start.as_ref().map(|s| s.language), Some(Dialect::English));
    assert_eq!(english.final_tally.as_ref().map(|f| f.language), Some(Dialect::English));

    let spanish = compiler.records(SPANISH_TRACE);
    assert_eq!(spanish.start.as_ref().map(|s| s.language), Some(Dialect::Spanish));
    assert_eq!(spanish.final_tally.as_ref().map(|f| f.language), Some(Dialect::Spanish));
    assert_eq!(
        spanish.start.as_ref().map(|s| s.sublabel.as_str()),
        Some("Diagnóstico Híbrido V2")
    );
}

#[test]
fn compile_trace_no_markers_expected_empty_graph() {
    let graph = compile_trace("Paciente estable.\nSin cambios.\n[2] Calculando...");
    assert!(graph.is_empty());
}

#[test]
fn compile_bytes_invalid_utf8_expected_surrounding_lines_compiled() {
    let mut bytes = b"--- INICIO\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    bytes.extend_from_slice(b"[SCORES FINALES] Dengue: 1 | COVID: 0");

    let graph = TraceCompiler::default().compile_bytes(&bytes);
    assert_eq!(graph.nodes.len(), 2);
}

#[test]
fn compile_with_custom_layout_expected_scaled_bands() {
    let compiler = TraceCompiler::new(LayoutConfig {
        center_x: 0,
        band_height: 200,
        ..LayoutConfig::default()
    });
    let graph = compiler.compile(SPANISH_TRACE);

    let final_node = graph.node("final-scores").expect("final node should exist");
    assert_eq!(final_node.position, Position::new(0, 600));
    assert_eq!(graph.node("score-0").map(|n| n.position.x), Some(-270));
}

#[test]
fn compile_response_missing_trace_expected_empty_graph() {
    let graph = compile_response(&serde_json::json!({ "deterministic": { "diagnostico": "covid" } }));
    assert!(graph.is_empty());

    let graph = compile_response(&serde_json::json!({
        "deterministic": { "razonamiento": SPANISH_TRACE }
    }));
    assert_eq!(graph.nodes.len(), 5);
}

#[test]
fn compile_trace_activation_without_rule_name_expected_alarm_node() {
    let graph = compile_trace(
        "--- INICIO\n\
         [1] Evaluando signos\n\
         ⚠️ ALARMA ACTIVADA: Dengue grave detectado\n\
         -> Tos: COVID(+2) | Dengue(0)",
    );

    let kinds: Vec<_> = graph.nodes.iter().map(|n| (n.id.as_str(), n.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            ("start", NodeKind::Start),
            ("alarm", NodeKind::Alarm),
            ("score-0", NodeKind::Score),
        ]
    );
    let start_edge = graph
        .outgoing_edges("start")
        .next()
        .expect("start should feed the alarm node");
    assert!(start_edge.emphasized);
    assert!(graph.node("alarm").is_some_and(|n| n.payload.items.is_empty()));
}

#[test]
fn compile_trace_mixed_dialect_markers_expected_all_stages() {
    let graph = compile_trace(
        "--- INICIO Diagnóstico Híbrido V2 ---\n\
         [1] Evaluating alarm signs\n\
         [FINAL SCORES] Dengue: 1 | COVID: 0",
    );

    assert_eq!(
        ids(graph.nodes.iter().map(|n| n.id.as_str())),
        vec!["start", "no-alarm", "final-scores"]
    );
    // Labels follow the dialect of the first marker.
    let no_alarm = graph.node("no-alarm").expect("no-alarm node should exist");
    assert_eq!(no_alarm.payload.title, "✅ Sin Alarmas");
    let final_node = graph.node("final-scores").expect("final node should exist");
    assert_eq!(final_node.payload.title, "📊 Scores Finales");
    assert_eq!(final_node.position, Position::new(400, 240));

    let records = TraceCompiler::default().records(
        "--- INICIO\n[FINAL SCORES] Dengue: 1 | COVID: 0",
    );
    assert_eq!(records.final_tally.map(|f| f.language), Some(Dialect::Spanish));
}
