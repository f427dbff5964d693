// ABOUTME: Error types for template compilation and rendering
// ABOUTME: Defines specific error types for syntax, property lookup, and engine failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template syntax error: {0}")]
    SyntaxError(String),

    #[error("No such property: {0}")]
    MissingProperty(String),

    #[error("Invalid template function: {0}")]
    InvalidFunction(String),

    #[error("System information error: {0}")]
    SystemError(String),

    #[error("Handlebars error: {0}")]
    HandlebarsError(#[from] handlebars::RenderError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
