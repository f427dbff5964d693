// ABOUTME: Render outcome type carrying either rendered text or a captured error payload
// ABOUTME: Render failures become data in the step result, never step failure

use std::error::Error;

const FAILURE_PREFIX: &str = "Exception raised during template rendering: ";

/// Result of one render. `Failure` holds the full error payload text that the
/// step returns in place of rendered output; the calling layer always unwraps
/// to a string, so a failed render never aborts the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Success(String),
    Failure(String),
}

impl RenderOutcome {
    /// Capture an error into the standard failure payload: the fixed prefix,
    /// the error message, a blank line, and the formatted cause trace.
    pub fn capture(err: &dyn Error) -> Self {
        RenderOutcome::Failure(format!(
            "{}{}\n\n{}",
            FAILURE_PREFIX,
            err,
            format_trace(err)
        ))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RenderOutcome::Success(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RenderOutcome::Success(text) | RenderOutcome::Failure(text) => text,
        }
    }

    /// Unwrap to the step's return string regardless of variant
    pub fn into_text(self) -> String {
        match self {
            RenderOutcome::Success(text) | RenderOutcome::Failure(text) => text,
        }
    }
}

/// Format an error and its cause chain, one frame per line
fn format_trace(err: &dyn Error) -> String {
    let mut lines = vec![format!("{}", err)];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("    caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}
