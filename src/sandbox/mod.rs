// ABOUTME: Sandboxed execution boundary for template rendering
// ABOUTME: Checks template operations against an allowlist before the render runs

use std::collections::HashSet;
use thiserror::Error;

use crate::template::{self, TemplateError};

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Sandbox rejected operation: {operation} is not on the allowlist")]
    SecurityRejection { operation: String },

    #[error(transparent)]
    Render(#[from] TemplateError),
}

pub type Result<T> = std::result::Result<T, SandboxError>;

/// Operations a sandboxed template is permitted to call.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    operations: HashSet<String>,
}

impl Allowlist {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard allowlist: pure helpers only. Host-touching operations
    /// (env, hostname, file_exists) must be permitted explicitly.
    pub fn standard() -> Self {
        Self::empty()
            .permit("timestamp")
            .permit("uuid")
            .permit("base64_encode")
            .permit("base64_decode")
    }

    pub fn permit(mut self, operation: &str) -> Self {
        self.operations.insert(operation.to_string());
        self
    }

    pub fn permits(&self, operation: &str) -> bool {
        self.operations.contains(operation)
    }
}

/// Isolation boundary for sandboxed renders. Injected into the step so test
/// doubles can stand in for the real interception.
pub trait Sandbox: Send + Sync {
    /// Run a render under the allowlist. `operations` lists every operation
    /// the template body calls; a disallowed one fails the render.
    fn run_isolated(
        &self,
        allowlist: &Allowlist,
        operations: &[String],
        render: &mut dyn FnMut() -> template::Result<String>,
    ) -> Result<String>;
}

/// Default sandbox: rejects any operation outside the allowlist, then lets
/// the render run to completion.
pub struct InterceptingSandbox;

impl Sandbox for InterceptingSandbox {
    fn run_isolated(
        &self,
        allowlist: &Allowlist,
        operations: &[String],
        render: &mut dyn FnMut() -> template::Result<String>,
    ) -> Result<String> {
        for operation in operations {
            if !allowlist.permits(operation) {
                return Err(SandboxError::SecurityRejection {
                    operation: operation.clone(),
                });
            }
        }
        Ok(render()?)
    }
}

/// Sandbox that performs no interception at all. Useful in tests and for
/// embedders that gate templates elsewhere.
pub struct PermissiveSandbox;

impl Sandbox for PermissiveSandbox {
    fn run_isolated(
        &self,
        _allowlist: &Allowlist,
        _operations: &[String],
        render: &mut dyn FnMut() -> template::Result<String>,
    ) -> Result<String> {
        Ok(render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_allowlist() {
        let allowlist = Allowlist::standard();
        assert!(allowlist.permits("uuid"));
        assert!(allowlist.permits("timestamp"));
        assert!(!allowlist.permits("env"));
        assert!(!allowlist.permits("hostname"));
    }

    #[test]
    fn test_permit_extends_allowlist() {
        let allowlist = Allowlist::standard().permit("env");
        assert!(allowlist.permits("env"));
    }

    #[test]
    fn test_disallowed_operation_rejected_before_render() {
        let sandbox = InterceptingSandbox;
        let mut ran = false;
        let result = sandbox.run_isolated(
            &Allowlist::standard(),
            &["env".to_string()],
            &mut || {
                ran = true;
                Ok("should not happen".to_string())
            },
        );

        assert!(!ran);
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sandbox rejected operation: env is not on the allowlist"
        );
    }

    #[test]
    fn test_allowed_operations_render() {
        let sandbox = InterceptingSandbox;
        let result = sandbox.run_isolated(
            &Allowlist::standard(),
            &["uuid".to_string()],
            &mut || Ok("rendered".to_string()),
        );
        assert_eq!(result.unwrap(), "rendered");
    }

    #[test]
    fn test_permissive_sandbox_ignores_allowlist() {
        let sandbox = PermissiveSandbox;
        let result = sandbox.run_isolated(&Allowlist::empty(), &["env".to_string()], &mut || {
            Ok("rendered".to_string())
        });
        assert_eq!(result.unwrap(), "rendered");
    }
}
