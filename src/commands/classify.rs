use crate::classification::{AnalysisSession, Axis, Catalog, DeterminismAxis, PurityAxis};
use crate::cli::AxisChoice;
use crate::config::CatalogConfig;
use crate::graph::ProgramGraph;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

pub struct ClassifyConfig {
    pub graph: PathBuf,
    pub config: Option<PathBuf>,
    pub axis: AxisChoice,
    pub unit: Option<String>,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Row {
    unit: String,
    classification: String,
}

pub fn classify_units(config: ClassifyConfig) -> Result<()> {
    let settings = super::resolve_config(config.config.as_deref())?;
    let graph = ProgramGraph::load(&config.graph)?;
    let max_rounds = settings.architecture.max_rounds;

    let rows = match config.axis {
        AxisChoice::Purity => classify::<PurityAxis>(&graph, &settings.purity, max_rounds, config.unit.as_deref())?,
        AxisChoice::Determinism => {
            classify::<DeterminismAxis>(&graph, &settings.determinism, max_rounds, config.unit.as_deref())?
        }
    };
    let axis = match config.axis {
        AxisChoice::Purity => PurityAxis::NAME,
        AxisChoice::Determinism => DeterminismAxis::NAME,
    };

    match config.format {
        OutputFormat::Json => output::output_json(&rows, None)?,
        OutputFormat::Terminal => print!(
            "{}",
            output::render_classifications(
                axis,
                rows.iter().map(|row| (row.unit.as_str(), row.classification.clone()))
            )
        ),
    }
    Ok(())
}

fn classify<A: Axis>(
    graph: &ProgramGraph,
    catalog: &CatalogConfig,
    max_rounds: Option<usize>,
    only: Option<&str>,
) -> Result<Vec<Row>> {
    let catalog = Catalog::from_config(catalog, A::standard_catalog());
    let mut session = AnalysisSession::<A>::new(catalog, Vec::<String>::new());
    if let Some(max_rounds) = max_rounds {
        session = session.with_max_rounds(max_rounds);
    }
    session.load(graph);
    session.run()?;

    if let Some(name) = only {
        let value = session.classification_of(name)?;
        return Ok(vec![Row {
            unit: name.to_string(),
            classification: value.to_string(),
        }]);
    }

    Ok(session
        .program()
        .units()
        .iter()
        .filter(|unit| unit.submitted)
        .map(|unit| Row {
            unit: unit.qualified_name.clone(),
            classification: session.classification_by_id(unit.id).to_string(),
        })
        .collect())
}
