// ABOUTME: Application driver wiring CLI arguments into one step invocation
// ABOUTME: Builds the workspace, cache, sandbox, and approval components and runs the step

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use super::args::Args;
use super::config::Config;
use crate::approval::InMemoryApprovals;
use crate::cache::TemplateCache;
use crate::sandbox::{Allowlist, InterceptingSandbox};
use crate::step::{StepExecution, TemplateRequest, TracingSink};
use crate::workspace::FsWorkspace;

pub struct App {
    config: Config,
}

impl App {
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        init_logging(&config, args.verbose)?;

        Ok(Self { config })
    }

    pub fn run(&self, args: &Args) -> Result<()> {
        let workspace_dir = match &args.workspace {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("failed to determine working directory")?,
        };
        let workspace = FsWorkspace::new(workspace_dir);

        let mut allowlist = Allowlist::standard();
        for operation in &self.config.sandbox.allow {
            allowlist = allowlist.permit(operation);
        }

        // A one-shot runner has no administrator loop, so unrestricted mode
        // does not gate scripts here
        let step = StepExecution::new(
            Arc::new(TemplateCache::new(self.config.cache_capacity)),
            Arc::new(InMemoryApprovals::auto_approve()),
            Arc::new(InterceptingSandbox),
            allowlist,
        )?;

        let mut request = TemplateRequest::new()
            .with_bindings(self.collect_bindings(args)?)
            .in_sandbox(args.sandbox);
        if let Some(file) = &args.file {
            request = request.with_file(file);
        }
        if let Some(text) = &args.text {
            request = request.with_text(text);
        }

        let rendered = step.run(&request, &workspace, &TracingSink)?;
        println!("{}", rendered);
        Ok(())
    }

    /// Merge bindings from the YAML file (if any) with key=value overrides
    fn collect_bindings(&self, args: &Args) -> Result<Map<String, JsonValue>> {
        let mut bindings = Map::new();

        if let Some(path) = &args.bindings_file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read bindings file: {}", path.display()))?;
            let value: JsonValue = serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse bindings file: {}", path.display()))?;
            let map = value
                .as_object()
                .ok_or_else(|| anyhow!("bindings file must contain a mapping"))?;
            bindings.extend(map.clone());
        }

        for binding in &args.bindings {
            let (key, value) = binding
                .split_once('=')
                .ok_or_else(|| anyhow!("invalid binding (expected KEY=VALUE): {}", binding))?;
            bindings.insert(key.to_string(), JsonValue::String(value.to_string()));
        }

        Ok(bindings)
    }
}

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { &config.logging.level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stencil={}", level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A second init (e.g. in tests) keeps the existing subscriber
    if config.logging.format == "json" {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(argv)
    }

    #[test]
    fn test_collect_inline_bindings() {
        let app = App {
            config: Config::default(),
        };
        let args = parse(&["stencil", "--text", "x", "-b", "name=Grace", "-b", "env=ci"]);

        let bindings = app.collect_bindings(&args).unwrap();
        assert_eq!(bindings["name"], "Grace");
        assert_eq!(bindings["env"], "ci");
    }

    #[test]
    fn test_bindings_file_merged_with_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bindings.yaml");
        fs::write(&path, "name: File\ncount: 3\n").unwrap();

        let app = App {
            config: Config::default(),
        };
        let args = parse(&[
            "stencil",
            "--text",
            "x",
            "--bindings-file",
            path.to_str().unwrap(),
            "-b",
            "name=Override",
        ]);

        let bindings = app.collect_bindings(&args).unwrap();
        assert_eq!(bindings["name"], "Override");
        assert_eq!(bindings["count"], 3);
    }

    #[test]
    fn test_invalid_binding_rejected() {
        let app = App {
            config: Config::default(),
        };
        let args = parse(&["stencil", "--text", "x", "-b", "no-equals-sign"]);
        assert!(app.collect_bindings(&args).is_err());
    }
}
