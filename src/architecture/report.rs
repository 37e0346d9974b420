use super::dependencies::DependencyViolation;
use crate::classification::{AnalysisSession, Axis, Grade, Lattice, RunSummary};
use crate::diagnostics::Diagnostic;
use serde::Serialize;

/// A core unit classified at the absorbing value of an axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitViolation {
    pub unit: String,
    pub classification: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisReport {
    pub axis: &'static str,
    pub summary: RunSummary,
    pub violations: Vec<UnitViolation>,
    /// Core units left undecided; reported, not failed
    pub unresolved: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AxisReport {
    pub(crate) fn collect<A: Axis>(
        session: &AnalysisSession<A>,
        summary: RunSummary,
        is_core: impl Fn(&str) -> bool,
    ) -> Self {
        let program = session.program();
        let mut violations = Vec::new();
        let mut unresolved = Vec::new();

        for unit in program
            .units()
            .iter()
            .filter(|unit| unit.submitted && is_core(program.type_name(unit.owner)))
        {
            let value = session.classification_by_id(unit.id);
            match value.grade() {
                Grade::Not => violations.push(UnitViolation {
                    unit: unit.qualified_name.clone(),
                    classification: value.to_string(),
                }),
                Grade::Unsure | Grade::Unchecked => unresolved.push(unit.qualified_name.clone()),
                Grade::Domain | Grade::Strict => {}
            }
        }

        Self {
            axis: A::NAME,
            summary,
            violations,
            unresolved,
            diagnostics: session.violations().to_vec(),
        }
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub description: String,
    pub dependency_violations: Vec<DependencyViolation>,
    pub purity: AxisReport,
    /// Absent when determinism checks are disabled
    pub determinism: Option<AxisReport>,
}

impl EvaluationResult {
    pub fn axes(&self) -> impl Iterator<Item = &AxisReport> {
        std::iter::once(&self.purity).chain(self.determinism.as_ref())
    }

    pub fn violation_count(&self) -> usize {
        self.dependency_violations.len() + self.axes().map(|axis| axis.violations.len()).sum::<usize>()
    }

    pub fn has_violations(&self) -> bool {
        self.violation_count() > 0
    }
}
