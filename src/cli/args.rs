//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Canopy content repository CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: canopy.toml)
    #[arg(short = 'C', long, default_value = "canopy.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate all webspace definitions
    #[command(visible_alias = "v")]
    Validate,

    /// List resolved URLs for a webspace environment
    #[command(visible_alias = "u")]
    Urls {
        /// Webspace key to list URLs for
        #[arg(short, long)]
        webspace: String,

        /// Environment name (default: [webspace].environment from config)
        #[arg(short, long)]
        environment: Option<String>,

        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resolve a request URL to a portal
    #[command(visible_alias = "m")]
    Match {
        /// Request URL, with or without scheme
        url: String,

        /// Environment name (default: [webspace].environment from config)
        #[arg(short, long)]
        environment: Option<String>,

        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Convert a flat path-keyed record list (JSON) into trees
    #[command(visible_alias = "t")]
    Tree {
        /// Input JSON file (reads stdin when omitted)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,

        /// Promote records with a missing parent to roots instead of
        /// dropping them
        #[arg(long)]
        promote_orphans: bool,
    },
}
