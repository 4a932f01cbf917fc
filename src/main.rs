//! pathrule - resolve content attributes to URLs and output paths.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use pathrule::config::RouteConfig;
use pathrule::log;

fn main() {
    if let Err(e) = run() {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    pathrule::logger::set_verbose(cli.verbose);

    let renderer = RouteConfig::load(&cli.config)?.into_renderer()?;

    match &cli.command {
        Commands::Resolve { args } => cli::run_resolve(&renderer, args),
        Commands::Check { args } => cli::run_check(&renderer, args),
        Commands::Rules => cli::run_rules(&renderer),
    }
}
