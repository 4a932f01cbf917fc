//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use pathrule::attrs::{Attrs, Value};
use pathrule::config::CONFIG_FILE;

/// Attribute-keyed URL and output path resolver
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve one attribute set to its URL and output path
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Resolve a batch of attribute sets and report url conflicts
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },

    /// List registered rules in match order
    #[command(visible_alias = "l")]
    Rules,
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Attributes as `key=value`; integers and booleans are detected
    #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_attr)]
    pub attrs: Vec<(String, Value)>,

    /// Print only the URL
    #[arg(short, long, conflicts_with = "fs")]
    pub url: bool,

    /// Print only the output path
    #[arg(short, long)]
    pub fs: bool,

    /// Percent-encode the URL
    #[arg(short, long)]
    pub encode: bool,
}

impl ResolveArgs {
    /// Collect the attribute pairs; a repeated key keeps its last value.
    pub fn to_attrs(&self) -> Attrs {
        self.attrs.iter().cloned().collect()
    }
}

/// Check command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// JSON file holding an array of attribute objects. Use `-` for stdin.
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Report problems as warnings without failing
    #[arg(long, short = 'w')]
    pub warn_only: bool,
}

fn parse_attr(text: &str) -> Result<(String, Value), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), Value::parse(value))),
        _ => Err(format!("expected `key=value`, got `{text}`")),
    }
}
