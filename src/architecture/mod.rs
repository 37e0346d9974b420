//! Functional-core architecture rule.
//!
//! Declares which packages form the functional core and which the
//! imperative shell, then checks that the core never depends on the shell
//! and that every core unit is side-effect free (and, optionally,
//! deterministic).

mod dependencies;
mod report;

pub use dependencies::{find_violations, DependencyKind, DependencyViolation};
pub use report::{AxisReport, EvaluationResult, UnitViolation};

use crate::classification::{AnalysisSession, Axis, Catalog, DeterminismAxis, PurityAxis};
use crate::config::{CatalogConfig, FuncoreConfig};
use crate::errors::Result;
use crate::graph::{Program, ProgramGraph};
use dependencies::matches_prefix;
use tracing::info;

pub fn functional_core_architecture() -> FunctionalCoreArchitecture {
    FunctionalCoreArchitecture::default()
}

#[derive(Debug, Clone)]
pub struct FunctionalCoreArchitecture {
    core: Vec<String>,
    shell: Vec<String>,
    report_scope: Option<Vec<String>>,
    purity: CatalogConfig,
    determinism: CatalogConfig,
    check_determinism: bool,
    max_rounds: Option<usize>,
    overridden_description: Option<String>,
}

impl Default for FunctionalCoreArchitecture {
    fn default() -> Self {
        Self {
            core: Vec::new(),
            shell: Vec::new(),
            report_scope: None,
            purity: CatalogConfig::default(),
            determinism: CatalogConfig::default(),
            check_determinism: true,
            max_rounds: None,
            overridden_description: None,
        }
    }
}

impl FunctionalCoreArchitecture {
    pub fn from_config(config: &FuncoreConfig) -> Self {
        let architecture = &config.architecture;
        Self {
            core: architecture.core.clone(),
            shell: architecture.shell.clone(),
            report_scope: architecture.report_scope.clone(),
            purity: config.purity.clone(),
            determinism: config.determinism.clone(),
            check_determinism: architecture.check_determinism,
            max_rounds: architecture.max_rounds,
            overridden_description: None,
        }
    }

    pub fn core_defined_by<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn shell_defined_by<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shell.extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Report diagnostics for these owners instead of the core
    pub fn reporting_on<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.report_scope = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn where_predefined_catalog_is_used(mut self) -> Self {
        self.purity.use_standard = true;
        self.determinism.use_standard = true;
        self
    }

    pub fn where_predefined_catalog_is_excluded(mut self) -> Self {
        self.purity.use_standard = false;
        self.determinism.use_standard = false;
        self
    }

    pub fn where_package(self, prefix: impl Into<String>) -> PackageClassification {
        PackageClassification {
            architecture: self,
            prefix: prefix.into(),
        }
    }

    pub fn check_determinism(mut self, enabled: bool) -> Self {
        self.check_determinism = enabled;
        self
    }

    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.overridden_description = Some(description.into());
        self
    }

    pub fn description(&self) -> String {
        if let Some(description) = &self.overridden_description {
            return description.clone();
        }

        let mut lines = vec![format!(
            "Functional core in [{}] with imperative shell in [{}]",
            self.core.join(", "),
            self.shell.join(", ")
        )];
        lines.push(if self.purity.use_standard {
            "using the predefined catalog".to_string()
        } else {
            "using only customized catalog entries".to_string()
        });
        let custom: Vec<&String> = self.purity.prefixes().chain(self.determinism.prefixes()).collect();
        if !custom.is_empty() {
            lines.push("with the following additionally classified packages".to_string());
            lines.extend(custom.into_iter().cloned());
        }
        if !self.check_determinism {
            lines.push("without determinism checks".to_string());
        }
        lines.join("\n")
    }

    fn report_scope(&self) -> &[String] {
        self.report_scope.as_deref().unwrap_or(&self.core)
    }

    /// Run the dependency check and both classification axes over `graph`.
    pub fn evaluate(&self, graph: &ProgramGraph) -> Result<EvaluationResult> {
        let program = Program::from_graph(graph);
        let dependency_violations = find_violations(&program, &self.core, &self.shell);

        let (purity, determinism) = rayon::join(
            || self.evaluate_axis::<PurityAxis>(graph, &self.purity),
            || {
                self.check_determinism
                    .then(|| self.evaluate_axis::<DeterminismAxis>(graph, &self.determinism))
            },
        );

        let result = EvaluationResult {
            description: self.description(),
            dependency_violations,
            purity: purity?,
            determinism: determinism.transpose()?,
        };
        info!(
            dependency_violations = result.dependency_violations.len(),
            violations = result.violation_count(),
            "Architecture evaluated"
        );
        Ok(result)
    }

    fn evaluate_axis<A: Axis>(&self, graph: &ProgramGraph, catalog: &CatalogConfig) -> Result<AxisReport> {
        let catalog = Catalog::from_config(catalog, A::standard_catalog());
        let mut session = AnalysisSession::<A>::new(catalog, self.report_scope().to_vec());
        if let Some(max_rounds) = self.max_rounds {
            session = session.with_max_rounds(max_rounds);
        }
        session.load(graph);
        let summary = session.run()?;

        let core = &self.core;
        let is_core = |owner: &str| !core.is_empty() && matches_prefix(core, owner);
        Ok(AxisReport::collect(&session, summary, is_core))
    }
}

/// Pending catalog entry for one package
#[derive(Debug, Clone)]
pub struct PackageClassification {
    architecture: FunctionalCoreArchitecture,
    prefix: String,
}

impl PackageClassification {
    pub fn is_considered_strictly_side_effect_free(mut self) -> FunctionalCoreArchitecture {
        self.architecture.purity.strict.push(self.prefix);
        self.architecture
    }

    pub fn is_considered_domain_specific_side_effect_free(mut self) -> FunctionalCoreArchitecture {
        self.architecture.purity.domain.push(self.prefix);
        self.architecture
    }

    pub fn is_considered_non_side_effect_free(mut self) -> FunctionalCoreArchitecture {
        self.architecture.purity.not.push(self.prefix);
        self.architecture
    }

    pub fn is_considered_strictly_deterministic(mut self) -> FunctionalCoreArchitecture {
        self.architecture.determinism.strict.push(self.prefix);
        self.architecture
    }

    pub fn is_considered_domain_deterministic(mut self) -> FunctionalCoreArchitecture {
        self.architecture.determinism.domain.push(self.prefix);
        self.architecture
    }

    pub fn is_considered_non_deterministic(mut self) -> FunctionalCoreArchitecture {
        self.architecture.determinism.not.push(self.prefix);
        self.architecture
    }
}
