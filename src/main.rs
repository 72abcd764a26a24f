//! Canopy - content repository and webspace routing CLI.

use anyhow::Result;
use clap::{ColorChoice, Parser};

use canopy::cli::{self, Cli, Commands};
use canopy::config::{AppConfig, init_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    canopy::logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Validate => {
            let config = init_config(AppConfig::load(&cli.config)?);
            cli::validate::run_validate(&config)
        }
        Commands::Urls {
            webspace,
            environment,
            json,
        } => {
            let config = init_config(AppConfig::load(&cli.config)?);
            cli::urls::run_urls(&config, webspace, environment.as_deref(), *json)
        }
        Commands::Match {
            url,
            environment,
            json,
        } => {
            let config = init_config(AppConfig::load(&cli.config)?);
            cli::match_url::run_match(&config, url, environment.as_deref(), *json)
        }
        Commands::Tree {
            input,
            promote_orphans,
        } => cli::tree::run_tree(input.as_deref(), *promote_orphans),
    }
}
