use crate::architecture::FunctionalCoreArchitecture;
use crate::graph::ProgramGraph;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct CheckConfig {
    pub graph: PathBuf,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub core: Option<Vec<String>>,
    pub shell: Option<Vec<String>>,
    pub no_determinism: bool,
}

/// Evaluate the architecture rule; fails when any violation is found.
pub fn check_architecture(config: CheckConfig) -> Result<()> {
    let mut settings = super::resolve_config(config.config.as_deref())?;
    if let Some(core) = config.core {
        settings.architecture.core = core;
    }
    if let Some(shell) = config.shell {
        settings.architecture.shell = shell;
    }
    if config.no_determinism {
        settings.architecture.check_determinism = false;
    }
    if settings.architecture.core.is_empty() {
        tracing::warn!("No core packages configured; only engine diagnostics will be reported");
    }

    let graph = ProgramGraph::load(&config.graph)?;
    let rule = FunctionalCoreArchitecture::from_config(&settings);
    let result = rule
        .evaluate(&graph)
        .with_context(|| format!("Failed to evaluate {}", config.graph.display()))?;

    match config.format {
        OutputFormat::Json => output::output_json(&result, config.output.as_deref())?,
        OutputFormat::Terminal => {
            let report = output::render_evaluation(&result);
            match &config.output {
                Some(path) => fs::write(path, report)?,
                None => print!("{report}"),
            }
        }
    }

    if result.has_violations() {
        anyhow::bail!(
            "Architecture check failed with {} violation(s)",
            result.violation_count()
        );
    }
    Ok(())
}
