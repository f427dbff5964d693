use anyhow::Result;
use clap::Parser;
use stencil::cli::{App, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    let app = App::from_args(&args)?;

    app.run(&args)
}
