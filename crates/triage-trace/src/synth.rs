use crate::{
    AlarmRecord, Edge, FinalRecord, Graph, LayoutConfig, Metric, Node, NodeKind, Position,
    RenderPayload, ScoreRecord, Stage, StageRecords, StartRecord, Vocabulary,
};

pub const START_NODE_ID: &str = "start";
pub const ALARM_NODE_ID: &str = "alarm";
pub const NO_ALARM_NODE_ID: &str = "no-alarm";
pub const FINAL_NODE_ID: &str = "final-scores";

pub fn score_node_id(ordinal: usize) -> String {
    format!("score-{ordinal}")
}

/// Builds the graph for one record set. Stages are visited in stacking
/// order; edges only join a stage to the one directly below it, so an
/// absent stage leaves its neighbours unconnected.
pub fn synthesize(records: &StageRecords, layout: &LayoutConfig) -> Graph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let vocabulary = records.dialect.vocabulary();

    let start = records
        .start
        .as_ref()
        .zip(records.band_of(Stage::Start))
        .map(|(record, band)| start_node(record, layout.centered(band)));

    let alarm_stage = records
        .alarm
        .as_ref()
        .zip(records.band_of(Stage::Alarm))
        .map(|(record, band)| alarm_node(record, vocabulary, layout.centered(band)));

    if let Some(start) = start {
        if let Some(alarm_stage) = &alarm_stage {
            edges.push(Edge::new(
                &start.id,
                &alarm_stage.id,
                alarm_stage.kind == NodeKind::Alarm,
            ));
        }
        nodes.push(start);
    }

    let alarm_stage_id = alarm_stage.as_ref().map(|node| node.id.clone());
    nodes.extend(alarm_stage);

    let mut score_ids = Vec::with_capacity(records.scores.len());
    if let Some(band) = records.band_of(Stage::Scores) {
        let row = layout.score_row(records.scores.len(), band);
        for (ordinal, (record, position)) in records.scores.iter().zip(row).enumerate() {
            let node = score_node(ordinal, record, position);
            if let Some(source) = &alarm_stage_id {
                edges.push(Edge::new(source, &node.id, false));
            }
            score_ids.push(node.id.clone());
            nodes.push(node);
        }
    }

    if let Some((record, band)) = records.final_tally.as_ref().zip(records.band_of(Stage::Final))
    {
        let node = final_node(record, vocabulary.final_title, layout.centered(band));
        for score_id in &score_ids {
            edges.push(Edge::new(score_id, &node.id, true));
        }
        nodes.push(node);
    }

    Graph { nodes, edges }
}

fn start_node(record: &StartRecord, position: Position) -> Node {
    Node {
        id: START_NODE_ID.to_string(),
        kind: NodeKind::Start,
        position,
        payload: RenderPayload::titled(&record.label).with_subtitle(&record.sublabel),
    }
}

fn alarm_node(
    record: &AlarmRecord,
    vocabulary: &Vocabulary,
    position: Position,
) -> Node {
    if record.activated {
        Node {
            id: ALARM_NODE_ID.to_string(),
            kind: NodeKind::Alarm,
            position,
            payload: RenderPayload::titled(vocabulary.alarm_title)
                .with_items(record.triggered_rule_names.clone()),
        }
    } else {
        Node {
            id: NO_ALARM_NODE_ID.to_string(),
            kind: NodeKind::NoAlarm,
            position,
            payload: RenderPayload::titled(vocabulary.no_alarm_title)
                .with_subtitle(vocabulary.no_alarm_subtitle),
        }
    }
}

fn score_node(ordinal: usize, record: &ScoreRecord, position: Position) -> Node {
    Node {
        id: score_node_id(ordinal),
        kind: NodeKind::Score,
        position,
        payload: RenderPayload::titled(&record.symptom_label)
            .with_metric(Metric::delta("COVID", record.covid_delta))
            .with_metric(Metric::delta("Dengue", record.dengue_delta)),
    }
}

fn final_node(record: &FinalRecord, title: &str, position: Position) -> Node {
    Node {
        id: FINAL_NODE_ID.to_string(),
        kind: NodeKind::Final,
        position,
        payload: RenderPayload::titled(title)
            .with_metric(Metric::total("Dengue", record.dengue_total))
            .with_metric(Metric::total("COVID", record.covid_total)),
    }
}
