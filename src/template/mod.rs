// ABOUTME: Template module for the stencil rendering step
// ABOUTME: Provides template compilation, rendering, and built-in helpers

pub mod compiler;
pub mod engine;
pub mod error;
pub mod helpers;

pub use compiler::{compile, CompiledTemplate};
pub use engine::TemplateEngine;
pub use error::{Result, TemplateError};
