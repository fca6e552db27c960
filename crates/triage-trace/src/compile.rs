use crate::{
    Graph, LayoutConfig, StageRecords, classify_trace, extract_records, reasoning_trace,
    synthesize,
};

/// Compiles reasoning traces into graphs with a fixed layout. Holds no
/// per-trace state, so one compiler can serve any number of threads.
#[derive(Clone, Debug, Default)]
pub struct TraceCompiler {
    layout: LayoutConfig,
}

impl TraceCompiler {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn records(&self, trace: &str) -> StageRecords {
        let classified = classify_trace(trace);
        if classified.is_unrecognized() {
            tracing::debug!(lines = classified.lines.len(), "no trace markers recognized");
            return StageRecords {
                dialect: classified.dialect,
                ..StageRecords::default()
            };
        }
        extract_records(&classified)
    }

    pub fn compile(&self, trace: &str) -> Graph {
        let records = self.records(trace);
        let graph = synthesize(&records, &self.layout);
        tracing::debug!(
            dialect = %records.dialect,
            scores = records.scores.len(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "compiled reasoning trace"
        );
        graph
    }

    /// Raw bytes are decoded lossily; invalid sequences can only cost the
    /// lines they sit on.
    pub fn compile_bytes(&self, trace: &[u8]) -> Graph {
        self.compile(&String::from_utf8_lossy(trace))
    }

    /// Missing traces compile to the empty graph.
    pub fn compile_optional(&self, trace: Option<&str>) -> Graph {
        trace.map(|trace| self.compile(trace)).unwrap_or_default()
    }

    pub fn compile_response(&self, response: &serde_json::Value) -> Graph {
        self.compile_optional(reasoning_trace(response))
    }
}

pub fn compile_trace(trace: &str) -> Graph {
    TraceCompiler::default().compile(trace)
}

pub fn compile_response(response: &serde_json::Value) -> Graph {
    TraceCompiler::default().compile_response(response)
}
