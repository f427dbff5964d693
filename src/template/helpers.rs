// ABOUTME: Built-in helper operations callable from template placeholders
// ABOUTME: Implements timestamp, uuid, hostname, environment, and encoding helpers

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use handlebars::{Context, Handlebars, Helper, Output, RenderContext, RenderError};
use std::collections::HashSet;
use std::env;
use std::path::Path;
use uuid::Uuid;

/// Timestamp helper - formats current time with optional format string
pub fn timestamp_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let format = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .unwrap_or("%Y-%m-%d %H:%M:%S");

    // chrono's DelayedFormat panics on display when the format string holds a
    // bad specifier, so the items are checked before formatting
    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.contains(&Item::Error) {
        return Err(RenderError::new(format!(
            "Invalid timestamp format: {}",
            format
        )));
    }

    let formatted = Utc::now().format_with_items(items.into_iter()).to_string();
    out.write(&formatted)?;
    Ok(())
}

/// UUID helper - generates a new UUID v4
pub fn uuid_helper(
    _h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    out.write(&Uuid::new_v4().to_string())?;
    Ok(())
}

/// Hostname helper - returns the system hostname
pub fn hostname_helper(
    _h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let hostname_os = hostname::get().map_err(|_| RenderError::new("Failed to get hostname"))?;
    out.write(&hostname_os.to_string_lossy())?;
    Ok(())
}

/// Environment variable helper - gets environment variable value
pub fn env_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let var_name = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| RenderError::new("env helper requires variable name parameter"))?;

    let default_value = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");

    let value = env::var(var_name).unwrap_or_else(|_| default_value.to_string());
    out.write(&value)?;
    Ok(())
}

/// File exists helper - checks if file exists.
///
/// Relative paths resolve against the runner process working directory, not
/// the step's workspace root: the engine is shared across invocations while
/// the workspace is supplied per invocation. Host-touching by nature, so it
/// is excluded from the standard sandbox allowlist.
pub fn file_exists_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let file_path = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| RenderError::new("file_exists helper requires file path parameter"))?;

    out.write(&Path::new(file_path).exists().to_string())?;
    Ok(())
}

/// Base64 encode helper
pub fn base64_encode_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| RenderError::new("base64_encode helper requires input parameter"))?;

    out.write(&BASE64.encode(input.as_bytes()))?;
    Ok(())
}

/// Base64 decode helper
pub fn base64_decode_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> std::result::Result<(), RenderError> {
    let input = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| RenderError::new("base64_decode helper requires input parameter"))?;

    let decoded = BASE64
        .decode(input.as_bytes())
        .map_err(|e| RenderError::new(format!("Invalid base64 input: {}", e)))?;
    let text = String::from_utf8(decoded)
        .map_err(|e| RenderError::new(format!("Decoded base64 is not UTF-8: {}", e)))?;
    out.write(&text)?;
    Ok(())
}

/// Register all built-in helpers, returning the registered operation names
pub fn register_helpers(
    handlebars: &mut Handlebars,
) -> std::result::Result<HashSet<String>, RenderError> {
    handlebars.register_helper("timestamp", Box::new(timestamp_helper));
    handlebars.register_helper("uuid", Box::new(uuid_helper));
    handlebars.register_helper("hostname", Box::new(hostname_helper));
    handlebars.register_helper("env", Box::new(env_helper));
    handlebars.register_helper("file_exists", Box::new(file_exists_helper));
    handlebars.register_helper("base64_encode", Box::new(base64_encode_helper));
    handlebars.register_helper("base64_decode", Box::new(base64_decode_helper));

    Ok([
        "timestamp",
        "uuid",
        "hostname",
        "env",
        "file_exists",
        "base64_encode",
        "base64_decode",
    ]
    .into_iter()
    .map(String::from)
    .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn try_render(template: &str) -> std::result::Result<String, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        register_helpers(&mut handlebars).unwrap();
        handlebars.render_template(template, &json!({}))
    }

    fn render(template: &str) -> String {
        try_render(template).unwrap()
    }

    #[test]
    fn test_timestamp_helper() {
        let result = render("{{timestamp \"%Y\"}}");
        assert_eq!(result.len(), 4);
        assert!(result.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_timestamp_helper_rejects_bad_format() {
        // A lone "%" is an invalid strftime specifier; it must error, not panic
        let err = try_render("{{timestamp \"%\"}}").unwrap_err();
        assert!(err.to_string().contains("Invalid timestamp format"));

        let err = try_render("{{timestamp \"%-%\"}}").unwrap_err();
        assert!(err.to_string().contains("Invalid timestamp format"));
    }

    #[test]
    fn test_uuid_helper() {
        let result = render("{{uuid}}");
        assert_eq!(result.len(), 36);
        assert_ne!(render("{{uuid}}"), result);
    }

    #[test]
    fn test_env_helper_with_default() {
        let result = render("{{env \"STENCIL_DOES_NOT_EXIST\" \"fallback\"}}");
        assert_eq!(result, "fallback");
    }

    #[test]
    fn test_base64_round() {
        assert_eq!(render("{{base64_encode \"hello\"}}"), "aGVsbG8=");
        assert_eq!(render("{{base64_decode \"aGVsbG8=\"}}"), "hello");
    }

    #[test]
    fn test_file_exists_helper() {
        assert_eq!(render("{{file_exists \"/definitely/not/a/file\"}}"), "false");
    }
}
