mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    init, new, render, templates, types, InitArgs, NewArgs, RenderArgs, TemplatesArgs, TypesArgs,
};
use tracing_subscriber::EnvFilter;

/// Funnel CLI - build and preview multi-step sales funnels
#[derive(Parser, Debug)]
#[command(name = "funnel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new funnel project
    Init(InitArgs),

    /// List the element palette
    Types(TypesArgs),

    /// List the funnel templates
    Templates(TemplatesArgs),

    /// Create a funnel from a template
    New(NewArgs),

    /// Render a page file to HTML or VDOM JSON
    Render(RenderArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Types(args) => types(args),
            Command::Templates(args) => templates(args),
            Command::New(args) => new(args, &cwd).map(|_| ()),
            Command::Render(args) => render(args, &cwd).map(|_| ()),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
