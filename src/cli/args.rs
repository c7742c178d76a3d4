//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Fold the styles and scripts of a static html export into shared files
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Project root holding the exported pages (default: current directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Config file path, relative to the root (default: sitepack.toml, optional)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Move styles and allowed scripts into styles.css / script.js
    #[command(visible_alias = "b")]
    Bundle {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Remove leftover preloader markup, nothing else
    #[command(visible_alias = "c")]
    Cleanup {
        #[command(flatten)]
        args: RunArgs,
    },
}

/// Shared arguments for Bundle and Cleanup commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Arguments of whichever subcommand was chosen.
    pub const fn run_args(&self) -> &RunArgs {
        match &self.command {
            Commands::Bundle { args } | Commands::Cleanup { args } => args,
        }
    }
}
