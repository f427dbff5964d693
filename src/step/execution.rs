// ABOUTME: Step execution: cache lookup, mode selection, render, and reporting
// ABOUTME: Render failures are captured into the returned text, never propagated

use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::debug;

use super::error::Result;
use super::outcome::RenderOutcome;
use super::reporter::{report_mode, LogSink};
use super::request::TemplateRequest;
use super::resolver;
use crate::approval::{ApprovalAuthority, ApprovalContext, TEMPLATE_LANGUAGE};
use crate::cache::TemplateCache;
use crate::sandbox::{Allowlist, Sandbox};
use crate::template::{self, TemplateEngine};
use crate::workspace::WorkspaceReader;

/// One configured instance of the rendering step. Holds the shared template
/// cache and the injected approval and sandbox collaborators; invocations may
/// run concurrently from overlapping pipeline workers.
pub struct StepExecution {
    engine: TemplateEngine,
    cache: Arc<TemplateCache>,
    approvals: Arc<dyn ApprovalAuthority>,
    sandbox: Arc<dyn Sandbox>,
    allowlist: Allowlist,
    approval_context: ApprovalContext,
}

impl StepExecution {
    pub fn new(
        cache: Arc<TemplateCache>,
        approvals: Arc<dyn ApprovalAuthority>,
        sandbox: Arc<dyn Sandbox>,
        allowlist: Allowlist,
    ) -> template::Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            cache,
            approvals,
            sandbox,
            allowlist,
            approval_context: ApprovalContext::default(),
        })
    }

    /// Record which job approval requests should be attributed to
    pub fn with_approval_context(mut self, context: ApprovalContext) -> Self {
        self.approval_context = context;
        self
    }

    /// Run one invocation of the step.
    ///
    /// Returns the rendered string, or the captured error payload when the
    /// render itself fails. Argument validation failures are the only hard
    /// errors.
    pub fn run(
        &self,
        request: &TemplateRequest,
        workspace: &dyn WorkspaceReader,
        log: &dyn LogSink,
    ) -> Result<String> {
        let text = resolver::resolve(request, workspace)?;
        let bindings = request.bindings.clone().unwrap_or_default();

        let outcome = self.render(&text, &bindings, request.run_in_sandbox, log);
        Ok(outcome.into_text())
    }

    /// Run one invocation, exposing the tagged outcome instead of the
    /// unwrapped string
    pub fn run_with_outcome(
        &self,
        request: &TemplateRequest,
        workspace: &dyn WorkspaceReader,
        log: &dyn LogSink,
    ) -> Result<RenderOutcome> {
        let text = resolver::resolve(request, workspace)?;
        let bindings = request.bindings.clone().unwrap_or_default();

        Ok(self.render(&text, &bindings, request.run_in_sandbox, log))
    }

    fn render(
        &self,
        text: &str,
        bindings: &Map<String, JsonValue>,
        sandboxed: bool,
        log: &dyn LogSink,
    ) -> RenderOutcome {
        let compiled = match self.cache.get_or_compile(text) {
            Ok(compiled) => compiled,
            Err(err) => return RenderOutcome::capture(&err),
        };
        let data = JsonValue::Object(bindings.clone());

        if sandboxed {
            report_mode(log, true);
            let result = self.sandbox.run_isolated(
                &self.allowlist,
                compiled.operations(),
                &mut || self.engine.render(&compiled, &data),
            );
            match result {
                Ok(rendered) => RenderOutcome::Success(rendered),
                Err(err) => RenderOutcome::capture(&err),
            }
        } else {
            report_mode(log, false);
            if let Err(err) =
                self.approvals
                    .ensure_approved(text, TEMPLATE_LANGUAGE, &self.approval_context)
            {
                return RenderOutcome::capture(&err);
            }
            match self.engine.render(&compiled, &data) {
                Ok(rendered) => {
                    debug!("template rendered, {} characters", rendered.len());
                    RenderOutcome::Success(rendered)
                }
                Err(err) => RenderOutcome::capture(&err),
            }
        }
    }
}
