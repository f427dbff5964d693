// ABOUTME: Template engine implementation wrapping Handlebars
// ABOUTME: Renders compiled templates against binding data with property checking

use handlebars::{Context, Handlebars, RenderContext, Renderable, StringOutput};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

use super::compiler::CompiledTemplate;
use super::error::{Result, TemplateError};
use super::helpers;

#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    operations: HashSet<String>,
}

impl TemplateEngine {
    /// Create a new template engine with all built-in helpers
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(false);
        handlebars.set_dev_mode(false);

        // Output is pipeline text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        let operations = helpers::register_helpers(&mut handlebars)
            .map_err(|e| TemplateError::SystemError(e.to_string()))?;

        Ok(Self {
            handlebars,
            operations,
        })
    }

    /// Render a compiled template with the given bindings.
    ///
    /// Every property path the template references must resolve in the
    /// bindings; an unresolved path fails the render with
    /// `No such property: <path>` before the engine runs. Calls to
    /// operations that are not registered fail the same way.
    pub fn render(&self, template: &CompiledTemplate, bindings: &JsonValue) -> Result<String> {
        for operation in template.operations() {
            if !self.operations.contains(operation) {
                return Err(TemplateError::InvalidFunction(operation.clone()));
            }
        }
        for property in template.properties() {
            if lookup_path(bindings, property).is_none() {
                return Err(TemplateError::MissingProperty(property.clone()));
            }
        }

        // Render the parsed template directly; the cache already paid the
        // parse cost at compile time
        let context = Context::wraps(bindings).map_err(TemplateError::HandlebarsError)?;
        let mut render_context = RenderContext::new(None);
        let mut output = StringOutput::new();
        template
            .template()
            .render(&self.handlebars, &context, &mut render_context, &mut output)
            .map_err(TemplateError::HandlebarsError)?;
        output
            .into_string()
            .map_err(|e| TemplateError::SystemError(e.to_string()))
    }

    /// Register a custom helper operation
    pub fn register_helper<F>(&mut self, name: &str, helper: F)
    where
        F: handlebars::HelperDef + Send + Sync + 'static,
    {
        self.handlebars.register_helper(name, Box::new(helper));
        self.operations.insert(name.to_string());
    }
}

/// Resolve a dotted property path against a JSON value
fn lookup_path<'a>(data: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
