// ABOUTME: Main library module for the stencil template rendering step
// ABOUTME: Exports all core modules and provides the public API

pub mod approval;
pub mod cache;
pub mod cli;
pub mod sandbox;
pub mod step;
pub mod template;
pub mod workspace;

// Re-export commonly used types
pub use approval::{ApprovalAuthority, ApprovalContext, InMemoryApprovals};
pub use cache::TemplateCache;
pub use sandbox::{Allowlist, InterceptingSandbox, Sandbox};
pub use step::{RenderOutcome, StepError, StepExecution, TemplateRequest};
pub use template::{CompiledTemplate, TemplateEngine, TemplateError};
pub use workspace::{FsWorkspace, WorkspaceReader};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
