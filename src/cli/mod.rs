// src/cli/mod.rs
//! CLI definitions for skillet
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "skillet")]
#[command(author, version)]
#[command(about = "Cook native C++ libraries from build recipes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Inputs that describe the target environment
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Profile file (TOML with [settings], [options] and [conf] tables)
    #[arg(short = 'p', long)]
    pub profile: Option<String>,

    /// Setting override, e.g. `-s os=Linux -s compiler.cppstd=20`
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Option override, e.g. `-o shared=True`
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Configuration knob, e.g. `-c tools.build:skip_test=True`
    #[arg(short = 'c', long = "conf", value_name = "KEY=VALUE")]
    pub conf: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cook a recipe: validate, generate, build, test and package
    Create {
        /// Path to the recipe file
        recipe: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Workspace root holding the sources (build and package folders go here)
        #[arg(long, default_value = ".")]
        root: String,

        /// Dependency cache directory (default: user cache dir)
        #[arg(long)]
        deps: Option<String>,

        /// Number of parallel build jobs (default: number of CPUs)
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Never clone the recipe's source repository
        #[arg(long)]
        no_source: bool,
    },

    /// Check a recipe file, and optionally a profile against it
    Validate {
        /// Path to the recipe file
        recipe: String,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Show the resolved requirement set for a profile
    Requirements {
        /// Path to the recipe file
        recipe: String,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Show the folder layout and final options for a profile
    Layout {
        /// Path to the recipe file
        recipe: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Workspace root
        #[arg(long, default_value = ".")]
        root: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
