// ABOUTME: Compiles placeholder-substitution template text into a reusable artifact
// ABOUTME: Translates <%= expr %> and ${expr} placeholders into a handlebars template

use super::error::{Result, TemplateError};

/// A compiled, immutable template artifact.
///
/// Holds the translated handlebars form of the source text together with the
/// binding properties it references and the helper operations it calls. Shared
/// across concurrent renders through `Arc`; owned by the template cache.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    source: String,
    handlebars_source: String,
    template: handlebars::Template,
    properties: Vec<String>,
    operations: Vec<String>,
}

impl CompiledTemplate {
    /// The original template text this artifact was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The translated handlebars template
    pub fn handlebars_source(&self) -> &str {
        &self.handlebars_source
    }

    /// The parsed handlebars template, reused across renders
    pub fn template(&self) -> &handlebars::Template {
        &self.template
    }

    /// Binding property paths referenced by the template
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Helper operations the template calls
    pub fn operations(&self) -> &[String] {
        &self.operations
    }
}

/// Compile template text into a [`CompiledTemplate`].
///
/// The template language supports `<%= expr %>` and `${expr}` placeholders
/// where `expr` is a binding property path (`firstname`, `user.name`) or a
/// helper call (`uuid()`, `env("HOME", "fallback")`). Script blocks
/// (`<% ... %>`) are rejected.
pub fn compile(source: &str) -> Result<CompiledTemplate> {
    let mut translated = String::with_capacity(source.len());
    let mut properties = Vec::new();
    let mut operations = Vec::new();

    let mut rest = source;
    loop {
        let tag = rest.find("<%");
        let dollar = rest.find("${");
        let next = match (tag, dollar) {
            (Some(t), Some(d)) => Some(if t < d { (t, true) } else { (d, false) }),
            (Some(t), None) => Some((t, true)),
            (None, Some(d)) => Some((d, false)),
            (None, None) => None,
        };

        let Some((at, is_tag)) = next else {
            push_literal(&mut translated, rest);
            break;
        };

        push_literal(&mut translated, &rest[..at]);
        rest = &rest[at..];

        let expr = if is_tag {
            if !rest.starts_with("<%=") {
                return Err(TemplateError::SyntaxError(
                    "script blocks (<% ... %>) are not supported; use <%= ... %> expressions"
                        .to_string(),
                ));
            }
            let body = &rest[3..];
            let end = find_closing_tag(body).ok_or_else(|| {
                TemplateError::SyntaxError("unterminated expression: missing %>".to_string())
            })?;
            rest = &body[end + 2..];
            &body[..end]
        } else {
            let body = &rest[2..];
            let end = find_closing_brace(body).ok_or_else(|| {
                TemplateError::SyntaxError("unterminated expression: missing }".to_string())
            })?;
            rest = &body[end + 1..];
            &body[..end]
        };

        translate_expression(expr.trim(), &mut translated, &mut properties, &mut operations)?;
    }

    // Parse once here; renders reuse the parsed template
    let template = handlebars::Template::compile(&translated)
        .map_err(|e| TemplateError::SyntaxError(e.to_string()))?;

    properties.sort();
    properties.dedup();
    operations.sort();
    operations.dedup();

    Ok(CompiledTemplate {
        source: source.to_string(),
        handlebars_source: translated,
        template,
        properties,
        operations,
    })
}

/// Append literal text, escaping anything handlebars would treat as a tag
fn push_literal(out: &mut String, literal: &str) {
    out.push_str(&literal.replace("{{", "\\{{"));
}

/// Find the index of the closing `%>` of a `<%= ... %>` placeholder, skipping
/// quoted sections so string arguments may contain `%>`
fn find_closing_tag(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut quote: Option<u8> = None;
    for (i, &c) in bytes.iter().enumerate() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                b'\'' | b'"' => quote = Some(c),
                b'%' if bytes.get(i + 1) == Some(&b'>') => return Some(i),
                _ => {}
            },
        }
    }
    None
}

/// Find the index of the closing `}` of a `${...}` placeholder, skipping
/// quoted sections so string arguments may contain `}`
fn find_closing_brace(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '}' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

fn translate_expression(
    expr: &str,
    out: &mut String,
    properties: &mut Vec<String>,
    operations: &mut Vec<String>,
) -> Result<()> {
    if expr.is_empty() {
        return Err(TemplateError::SyntaxError(
            "empty placeholder expression".to_string(),
        ));
    }

    if let Some(open) = expr.find('(') {
        let name = expr[..open].trim();
        if !is_identifier(name) {
            return Err(TemplateError::SyntaxError(format!(
                "invalid operation name: {}",
                name
            )));
        }
        let close = expr.rfind(')').ok_or_else(|| {
            TemplateError::SyntaxError(format!("missing closing parenthesis in call: {}", expr))
        })?;
        if !expr[close + 1..].trim().is_empty() {
            return Err(TemplateError::SyntaxError(format!(
                "unexpected text after call: {}",
                expr
            )));
        }

        out.push_str("{{");
        out.push_str(name);
        for arg in split_arguments(&expr[open + 1..close])? {
            out.push(' ');
            translate_argument(&arg, out, properties)?;
        }
        out.push_str("}}");
        operations.push(name.to_string());
        return Ok(());
    }

    if !is_property_path(expr) {
        return Err(TemplateError::SyntaxError(format!(
            "invalid placeholder expression: {}",
            expr
        )));
    }

    out.push_str("{{");
    out.push_str(expr);
    out.push_str("}}");
    properties.push(expr.to_string());
    Ok(())
}

/// Split a call argument list on commas, honoring quoted strings
fn split_arguments(list: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in list.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    current.push(c);
                }
                ',' => {
                    args.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }
    if quote.is_some() {
        return Err(TemplateError::SyntaxError(format!(
            "unterminated string literal in arguments: {}",
            list
        )));
    }

    let tail = current.trim();
    if !tail.is_empty() {
        args.push(tail.to_string());
    } else if !args.is_empty() {
        return Err(TemplateError::SyntaxError(format!(
            "trailing comma in arguments: {}",
            list
        )));
    }
    Ok(args)
}

fn translate_argument(arg: &str, out: &mut String, properties: &mut Vec<String>) -> Result<()> {
    let quoted = (arg.starts_with('\'') && arg.ends_with('\'') && arg.len() >= 2)
        || (arg.starts_with('"') && arg.ends_with('"') && arg.len() >= 2);

    if quoted {
        let inner = &arg[1..arg.len() - 1];
        out.push('"');
        out.push_str(&inner.replace('\\', "\\\\").replace('"', "\\\""));
        out.push('"');
        return Ok(());
    }

    if arg.parse::<f64>().is_ok() {
        out.push_str(arg);
        return Ok(());
    }

    if is_property_path(arg) {
        out.push_str(arg);
        properties.push(arg.to_string());
        return Ok(());
    }

    Err(TemplateError::SyntaxError(format!(
        "invalid call argument: {}",
        arg
    )))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_property_path(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let compiled = compile("no placeholders here").unwrap();
        assert_eq!(compiled.handlebars_source(), "no placeholders here");
        assert!(compiled.properties().is_empty());
        assert!(compiled.operations().is_empty());
    }

    #[test]
    fn test_expression_placeholder() {
        let compiled = compile("Dear <%= firstname %>").unwrap();
        assert_eq!(compiled.handlebars_source(), "Dear {{firstname}}");
        assert_eq!(compiled.properties(), ["firstname"]);
    }

    #[test]
    fn test_dollar_brace_placeholder() {
        let compiled = compile("Hello ${user.name}!").unwrap();
        assert_eq!(compiled.handlebars_source(), "Hello {{user.name}}!");
        assert_eq!(compiled.properties(), ["user.name"]);
    }

    #[test]
    fn test_operation_call_with_arguments() {
        let compiled = compile("home is <%= env(\"HOME\", \"unset\") %>").unwrap();
        assert_eq!(
            compiled.handlebars_source(),
            "home is {{env \"HOME\" \"unset\"}}"
        );
        assert_eq!(compiled.operations(), ["env"]);
        assert!(compiled.properties().is_empty());
    }

    #[test]
    fn test_call_with_property_argument() {
        let compiled = compile("<%= env(varname) %>").unwrap();
        assert_eq!(compiled.handlebars_source(), "{{env varname}}");
        assert_eq!(compiled.properties(), ["varname"]);
        assert_eq!(compiled.operations(), ["env"]);
    }

    #[test]
    fn test_script_block_rejected() {
        let err = compile("<% def x = 1 %>").unwrap_err();
        assert!(matches!(err, TemplateError::SyntaxError(_)));
        assert!(err.to_string().contains("script blocks"));
    }

    #[test]
    fn test_unterminated_expression() {
        assert!(compile("Dear <%= firstname").is_err());
        assert!(compile("Hello ${name").is_err());
    }

    #[test]
    fn test_literal_braces_are_escaped() {
        let compiled = compile("not a tag: {{name}}").unwrap();
        assert_eq!(compiled.handlebars_source(), "not a tag: \\{{name}}");
        assert!(compiled.properties().is_empty());
    }

    #[test]
    fn test_duplicate_references_deduplicated() {
        let compiled = compile("<%= a %> and <%= a %> and <%= b %>").unwrap();
        assert_eq!(compiled.properties(), ["a", "b"]);
    }

    #[test]
    fn test_brace_inside_quoted_argument() {
        let compiled = compile("${env(\"WEIRD}NAME\")}").unwrap();
        assert_eq!(compiled.handlebars_source(), "{{env \"WEIRD}NAME\"}}");
    }

    #[test]
    fn test_tag_close_inside_quoted_argument() {
        let compiled = compile("<%= env(\"a%>b\") %>").unwrap();
        assert_eq!(compiled.handlebars_source(), "{{env \"a%>b\"}}");
        assert_eq!(compiled.operations(), ["env"]);
    }

    #[test]
    fn test_empty_source_compiles() {
        let compiled = compile("").unwrap();
        assert_eq!(compiled.handlebars_source(), "");
    }

    #[test]
    fn test_invalid_expression() {
        assert!(compile("<%= 1 + 2 %>").is_err());
        assert!(compile("<%= %>").is_err());
    }
}
