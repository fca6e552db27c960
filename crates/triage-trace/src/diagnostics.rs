use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The renderer cannot rely on the graph.
    Error,
    /// Drawable, but the picture misstates the trace.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// Graph element a finding points at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "on", content = "id", rename_all = "snake_case")]
pub enum DiagnosticTarget {
    #[default]
    Graph,
    Node(String),
    Edge(String),
}

/// One finding of the graph lint pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub target: DiagnosticTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn error(rule: &str, message: impl Into<String>) -> Self {
        Self::with_severity(rule, Severity::Error, message)
    }

    pub fn warning(rule: &str, message: impl Into<String>) -> Self {
        Self::with_severity(rule, Severity::Warning, message)
    }

    fn with_severity(rule: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            severity,
            message: message.into(),
            target: DiagnosticTarget::Graph,
            hint: None,
        }
    }

    pub fn on_node(self, id: &str) -> Self {
        Self {
            target: DiagnosticTarget::Node(id.to_string()),
            ..self
        }
    }

    pub fn on_edge(self, id: &str) -> Self {
        Self {
            target: DiagnosticTarget::Edge(id.to_string()),
            ..self
        }
    }

    pub fn hint(self, hint: &str) -> Self {
        Self {
            hint: Some(hint.to_string()),
            ..self
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn node_id(&self) -> Option<&str> {
        match &self.target {
            DiagnosticTarget::Node(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule, self.message)?;
        match &self.target {
            DiagnosticTarget::Graph => Ok(()),
            DiagnosticTarget::Node(id) => write!(f, " (node {id})"),
            DiagnosticTarget::Edge(id) => write!(f, " (edge {id})"),
        }
    }
}
