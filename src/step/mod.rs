// ABOUTME: Pipeline step surface: request validation, mode selection, and rendering
// ABOUTME: Ties the resolver, cache, approval authority, and sandbox together

pub mod error;
pub mod execution;
pub mod outcome;
pub mod reporter;
pub mod request;
pub mod resolver;

pub use error::{Result, StepError, STEP_NAME};
pub use execution::StepExecution;
pub use outcome::RenderOutcome;
pub use reporter::{BufferSink, LogSink, TracingSink};
pub use request::TemplateRequest;
