// ABOUTME: Resolves step inputs into a single template-text string
// ABOUTME: Validates the file/text/bindings argument combinations

use super::error::{Result, StepError};
use super::request::TemplateRequest;
use crate::workspace::WorkspaceReader;

/// Turn the request's source arguments into template text.
///
/// Validation order matches the step contract: conflicting sources first,
/// then missing bindings, then file lookup failures. When neither source is
/// given the template text defaults to the empty string.
pub fn resolve(request: &TemplateRequest, workspace: &dyn WorkspaceReader) -> Result<String> {
    let file = request.file.as_deref().filter(|s| !s.trim().is_empty());
    let text = request.text.as_deref().filter(|s| !s.trim().is_empty());

    if file.is_some() && text.is_some() {
        return Err(StepError::TooManyArguments);
    }
    if request.bindings.is_none() {
        return Err(StepError::MissingBindings);
    }

    if let Some(path) = file {
        if workspace.is_directory(path) {
            return Err(StepError::FileIsDirectory {
                path: path.to_string(),
            });
        }
        if !workspace.exists(path) {
            return Err(StepError::FileNotFound {
                path: path.to_string(),
            });
        }
        return workspace
            .read_utf8(path)
            .map_err(|source| StepError::ReadFailed {
                path: path.to_string(),
                source,
            });
    }

    Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
}
