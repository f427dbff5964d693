// ABOUTME: Hard-failure error types for the rendering step
// ABOUTME: Argument and file errors that abort the calling pipeline step

use thiserror::Error;

/// Name the step is registered under in pipeline scripts
pub const STEP_NAME: &str = "renderTemplate";

/// Validation failures that abort the calling step. Render-time failures are
/// never reported this way; they are captured into the returned text instead.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("renderTemplate can take either a file or inline text, not both")]
    TooManyArguments,

    #[error("renderTemplate requires a bindings map")]
    MissingBindings,

    #[error("template file not found: {path}")]
    FileNotFound { path: String },

    #[error("template file is a directory: {path}")]
    FileIsDirectory { path: String },

    #[error("failed to read template file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StepError>;
