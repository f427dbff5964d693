// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the input surface of the stencil step runner

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(about = "Render a template against a set of bindings, optionally in a sandbox")]
#[command(version)]
pub struct Args {
    #[arg(short, long, help = "Template file, relative to the workspace")]
    pub file: Option<String>,

    #[arg(short, long, help = "Inline template text")]
    pub text: Option<String>,

    #[arg(
        short = 'b',
        long = "binding",
        value_name = "KEY=VALUE",
        help = "Template binding (repeatable)"
    )]
    pub bindings: Vec<String>,

    #[arg(long, help = "YAML file with a bindings map")]
    pub bindings_file: Option<PathBuf>,

    #[arg(long, help = "Render inside the sandbox allowlist")]
    pub sandbox: bool,

    #[arg(short, long, help = "Workspace directory (defaults to the current directory)")]
    pub workspace: Option<PathBuf>,

    #[arg(short, long, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
