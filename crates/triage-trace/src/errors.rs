use crate::Diagnostic;
use thiserror::Error;

/// Failures of the surfaces around the compiler. Compiling a trace itself
/// never fails.
#[derive(Debug, Error)]
pub enum TraceGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid layout config: {0}")]
    LayoutConfig(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A compiled graph that breaks at least one error-level lint rule. Carries
/// every finding, warnings included.
#[derive(Debug, Error, Clone)]
pub struct ValidationError {
    pub diagnostics: Vec<Diagnostic>,
    pub errors_count: usize,
}

impl ValidationError {
    /// Passes the findings through unless one of them is an error.
    pub fn raise_on_errors(diagnostics: Vec<Diagnostic>) -> Result<Vec<Diagnostic>, Self> {
        let errors_count = diagnostics.iter().filter(|d| d.is_error()).count();
        if errors_count == 0 {
            return Ok(diagnostics);
        }
        Err(Self {
            diagnostics,
            errors_count,
        })
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph breaks {} lint rule(s)", self.errors_count)?;
        if let Some(first) = self.diagnostics.iter().find(|d| d.is_error()) {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}
