//! Command-line argument definitions for the Simon CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the entry units, where sources and the
//! metamodel are found, the configuration file, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Simon compiler
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Names of the units to compile, e.g. `main` or `screens.home`
    #[arg(required_unless_present = "list_types")]
    pub entries: Vec<String>,

    /// Path to the metamodel catalog (TOML); overrides the configuration
    #[arg(short, long)]
    pub metamodel: Option<String>,

    /// Directory holding the source units
    #[arg(short, long, default_value = ".")]
    pub root: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// List the types visible under the given languages instead of compiling
    #[arg(long, num_args = 1.., value_name = "LANG")]
    pub list_types: Vec<String>,
}
