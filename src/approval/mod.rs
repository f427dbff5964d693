// ABOUTME: Script approval authority for unrestricted template execution
// ABOUTME: Records unapproved template text as pending until an administrator signs off

use std::collections::HashSet;
use std::sync::Mutex;
use thiserror::Error;

/// Language identifier recorded with pending scripts
pub const TEMPLATE_LANGUAGE: &str = "stencil-template";

#[derive(Error, Debug)]
pub enum ApprovalError {
    #[error("script not yet approved for use; an administrator must approve it")]
    Pending,
}

pub type Result<T> = std::result::Result<T, ApprovalError>;

/// Context of the invocation requesting approval, recorded alongside the
/// pending script so an administrator can see where it came from.
#[derive(Debug, Clone, Default)]
pub struct ApprovalContext {
    pub job: Option<String>,
}

impl ApprovalContext {
    pub fn for_job(job: impl Into<String>) -> Self {
        Self {
            job: Some(job.into()),
        }
    }
}

/// A script recorded as awaiting administrator approval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScript {
    pub text: String,
    pub language: String,
    pub job: Option<String>,
}

/// Gate for unrestricted (non-sandboxed) template execution.
pub trait ApprovalAuthority: Send + Sync {
    /// Idempotent: succeeds silently when `text` is already approved,
    /// otherwise records it as pending and returns [`ApprovalError::Pending`].
    fn ensure_approved(&self, text: &str, language: &str, context: &ApprovalContext)
        -> Result<()>;
}

struct ApprovalState {
    approved: HashSet<String>,
    pending: Vec<PendingScript>,
}

pub struct InMemoryApprovals {
    state: Mutex<ApprovalState>,
    auto_approve: bool,
}

impl InMemoryApprovals {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ApprovalState {
                approved: HashSet::new(),
                pending: Vec::new(),
            }),
            auto_approve: false,
        }
    }

    /// An authority that approves every script. For embedders (and the CLI)
    /// that do not gate unrestricted templates.
    pub fn auto_approve() -> Self {
        Self {
            auto_approve: true,
            ..Self::new()
        }
    }

    /// Administrator action: approve a script text and clear it from pending
    pub fn approve(&self, text: &str) {
        let mut state = self.state.lock().expect("approval state lock poisoned");
        state.approved.insert(text.to_string());
        state.pending.retain(|p| p.text != text);
    }

    pub fn is_approved(&self, text: &str) -> bool {
        self.auto_approve
            || self
                .state
                .lock()
                .expect("approval state lock poisoned")
                .approved
                .contains(text)
    }

    /// Scripts currently awaiting approval
    pub fn pending(&self) -> Vec<PendingScript> {
        self.state
            .lock()
            .expect("approval state lock poisoned")
            .pending
            .clone()
    }
}

impl Default for InMemoryApprovals {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalAuthority for InMemoryApprovals {
    fn ensure_approved(
        &self,
        text: &str,
        language: &str,
        context: &ApprovalContext,
    ) -> Result<()> {
        if self.auto_approve {
            return Ok(());
        }

        let mut state = self.state.lock().expect("approval state lock poisoned");
        if state.approved.contains(text) {
            return Ok(());
        }

        if !state.pending.iter().any(|p| p.text == text) {
            state.pending.push(PendingScript {
                text: text.to_string(),
                language: language.to_string(),
                job: context.job.clone(),
            });
        }
        Err(ApprovalError::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unapproved_script_goes_pending() {
        let approvals = InMemoryApprovals::new();
        let result =
            approvals.ensure_approved("<%= a %>", TEMPLATE_LANGUAGE, &ApprovalContext::default());

        assert!(matches!(result, Err(ApprovalError::Pending)));
        let pending = approvals.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].text, "<%= a %>");
        assert_eq!(pending[0].language, TEMPLATE_LANGUAGE);
    }

    #[test]
    fn test_ensure_approved_is_idempotent() {
        let approvals = InMemoryApprovals::new();
        let context = ApprovalContext::for_job("nightly-build");
        for _ in 0..3 {
            let _ = approvals.ensure_approved("<%= a %>", TEMPLATE_LANGUAGE, &context);
        }

        let pending = approvals.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].job.as_deref(), Some("nightly-build"));
    }

    #[test]
    fn test_approval_clears_pending() {
        let approvals = InMemoryApprovals::new();
        let _ = approvals.ensure_approved("<%= a %>", TEMPLATE_LANGUAGE, &ApprovalContext::default());

        approvals.approve("<%= a %>");
        assert!(approvals.is_approved("<%= a %>"));
        assert!(approvals.pending().is_empty());
        assert!(approvals
            .ensure_approved("<%= a %>", TEMPLATE_LANGUAGE, &ApprovalContext::default())
            .is_ok());
    }

    #[test]
    fn test_auto_approve() {
        let approvals = InMemoryApprovals::auto_approve();
        assert!(approvals
            .ensure_approved("anything", TEMPLATE_LANGUAGE, &ApprovalContext::default())
            .is_ok());
        assert!(approvals.pending().is_empty());
    }
}
