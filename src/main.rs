use anyhow::Result;
use clap::Parser;
use funcore::cli::{Cli, Commands};
use funcore::commands::{check_architecture, classify_units, init_config, CheckConfig, ClassifyConfig};
use funcore::observability::init_tracing;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            graph,
            config,
            format,
            output,
            core,
            shell,
            no_determinism,
            verbosity,
        } => {
            init_tracing(verbosity);
            check_architecture(CheckConfig {
                graph,
                config,
                format,
                output,
                core,
                shell,
                no_determinism,
            })
        }
        Commands::Classify {
            graph,
            config,
            axis,
            unit,
            format,
            verbosity,
        } => {
            init_tracing(verbosity);
            classify_units(ClassifyConfig {
                graph,
                config,
                axis,
                unit,
                format,
            })
        }
        Commands::Init { force } => init_config(force),
    }
}
