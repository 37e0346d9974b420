use crate::output::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AxisChoice {
    /// Side-effect freedom
    Purity,
    /// Equal results for equal inputs
    Determinism,
}

#[derive(Parser, Debug)]
#[command(name = "funcore")]
#[command(about = "Functional-core architecture checker", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a program graph against the functional-core architecture
    Check {
        /// Program graph exported as JSON
        graph: PathBuf,

        /// Configuration file (defaults to the nearest .funcore.toml)
        #[arg(short, long, env = "FUNCORE_CONFIG")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Core package prefixes, overriding the configuration
        #[arg(long, value_delimiter = ',')]
        core: Option<Vec<String>>,

        /// Shell package prefixes, overriding the configuration
        #[arg(long, value_delimiter = ',')]
        shell: Option<Vec<String>>,

        /// Skip the determinism axis
        #[arg(long = "no-determinism")]
        no_determinism: bool,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Print the classification of every unit along one axis
    Classify {
        /// Program graph exported as JSON
        graph: PathBuf,

        /// Configuration file (defaults to the nearest .funcore.toml)
        #[arg(short, long, env = "FUNCORE_CONFIG")]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "purity")]
        axis: AxisChoice,

        /// Only print this unit (qualified name)
        #[arg(short, long)]
        unit: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .funcore.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
