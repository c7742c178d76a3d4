//! sitepack - Consolidates the styles and scripts of a static html export.

mod bundle;
mod cli;
mod config;
mod logger;
mod page;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PackConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.run_args().verbose);

    let config = PackConfig::load(&cli)?;

    match &cli.command {
        Commands::Bundle { args } => cli::bundle::run_bundle(&config, args).map(|_| ()),
        Commands::Cleanup { args } => cli::cleanup::run_cleanup(&config, args).map(|_| ()),
    }
}
