// ABOUTME: Step input surface for one template rendering invocation
// ABOUTME: Holds the template source, bindings, and sandbox flag

use serde::Deserialize;
use serde_json::{Map, Value};

/// Input to one invocation of the rendering step.
///
/// Exactly one of `file` and `text` may be set (blank values count as unset).
/// `bindings` must be present, though it may be empty. The sandbox flag
/// defaults to off, which selects the script-approval path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateRequest {
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub bindings: Option<Map<String, Value>>,

    #[serde(default, alias = "runInSandbox")]
    pub run_in_sandbox: bool,
}

impl TemplateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_bindings(mut self, bindings: Map<String, Value>) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Convenience for an empty (but present) bindings map
    pub fn with_empty_bindings(mut self) -> Self {
        self.bindings = Some(Map::new());
        self
    }

    pub fn in_sandbox(mut self, sandboxed: bool) -> Self {
        self.run_in_sandbox = sandboxed;
        self
    }
}
