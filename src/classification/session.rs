//! Fixed-point classification driver.
//!
//! One [`AnalysisSession`] owns everything a run needs: the interned
//! program, the catalog, the classification table, the pending interface
//! set and the diagnostics. Nothing is shared between sessions, so
//! independent sessions can run on separate threads.

use super::axis::{Axis, DeterminismAxis, LocalOutcome, PurityAxis};
use super::catalog::Catalog;
use super::dispatch::{resolve_dispatch, DispatchOutcome};
use super::lattice::{Grade, Lattice};
use super::propagation::{evaluate_calls, undecided_callees, CallOutcome};
use crate::diagnostics::{Diagnostic, Diagnostics, ReasonCode};
use crate::errors::{Error, Result};
use crate::graph::{cyclic_units, CodeUnit, Program, ProgramGraph, TypeDecl, UnitDecl, UnitId};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, info, info_span, warn};

const MIN_ROUNDS: usize = 16;

pub type PuritySession = AnalysisSession<PurityAxis>;
pub type DeterminismSession = AnalysisSession<DeterminismAxis>;

/// Number of units per lattice value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationCounts {
    pub strict: usize,
    pub domain: usize,
    pub not: usize,
    pub unsure: usize,
    pub unchecked: usize,
    /// Interface units still waiting on their overriders
    pub open_interfaces: usize,
}

impl ClassificationCounts {
    pub fn total(&self) -> usize {
        self.strict + self.domain + self.not + self.unsure + self.unchecked
    }
}

impl fmt::Display for ClassificationCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "strict={} domain={} not={} unsure={} unchecked={} open_interfaces={}",
            self.strict, self.domain, self.not, self.unsure, self.unchecked, self.open_interfaces
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub rounds: usize,
    pub converged: bool,
    pub counts: ClassificationCounts,
}

/// A disposable classification run over one program along one axis.
#[derive(Debug)]
pub struct AnalysisSession<A: Axis> {
    program: Program,
    catalog: Catalog,
    table: Vec<Grade>,
    /// Provisional floor of units left pending by the local rule
    floors: Vec<Option<Grade>>,
    pending_interfaces: BTreeSet<UnitId>,
    diagnostics: Diagnostics,
    max_rounds: Option<usize>,
    axis: PhantomData<A>,
}

impl<A: Axis> AnalysisSession<A> {
    /// Session reporting only units whose owner starts with one of `scope`.
    /// An empty scope reports everything.
    pub fn new<I, S>(catalog: Catalog, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: Program::new(),
            catalog,
            table: Vec::new(),
            floors: Vec::new(),
            pending_interfaces: BTreeSet::new(),
            diagnostics: Diagnostics::scoped(scope),
            max_rounds: None,
            axis: PhantomData,
        }
    }

    pub fn with_standard_catalog<I, S>(scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(A::standard_catalog(), scope)
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds.max(1));
        self
    }

    pub fn declare_type(&mut self, decl: &TypeDecl) {
        self.program.declare_type(decl);
    }

    /// Submit a unit; a unit submitted twice keeps the later declaration.
    pub fn submit(&mut self, decl: &UnitDecl) -> UnitId {
        let id = self.program.submit(decl);
        self.sync_table();
        self.reset_unit(id);
        id
    }

    pub fn load(&mut self, graph: &ProgramGraph) {
        for decl in &graph.types {
            self.declare_type(decl);
        }
        for decl in &graph.units {
            self.submit(decl);
        }
    }

    /// Run rounds until nothing changes or the round bound is reached.
    pub fn run(&mut self) -> Result<RunSummary> {
        let span = info_span!("classify", axis = A::NAME, units = self.program.unit_count());
        let _enter = span.enter();

        if !self.program.is_frozen() {
            self.program.freeze();
            self.reset_table();
        }
        self.diagnostics.clear_end_of_run();

        let bound = self.round_bound();
        let mut rounds = 0;
        let mut converged = false;
        while rounds < bound {
            rounds += 1;
            let changed = self.round()?;
            debug!(round = rounds, counts = %self.counts(), "Round complete");
            if !changed {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(rounds, "{} classification did not converge", A::NAME);
            self.diagnostics.record_run_level(
                ReasonCode::NonConvergence,
                format!(
                    "{} classification still changing after {} rounds",
                    A::NAME,
                    bound
                ),
            );
        }
        self.report_unresolved();

        let counts = self.counts();
        info!(rounds, converged, counts = %counts, "Classification finished");
        Ok(RunSummary {
            rounds,
            converged,
            counts,
        })
    }

    pub fn classification_of(&self, qualified_name: &str) -> Result<A::Value> {
        self.program
            .unit_id(qualified_name)
            .map(|id| self.classification_by_id(id))
            .ok_or_else(|| Error::not_registered(qualified_name))
    }

    pub fn classification_by_id(&self, id: UnitId) -> A::Value {
        A::Value::from_grade(self.table.get(id.index()).copied().unwrap_or_default())
    }

    pub fn violations(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Units currently classified as `value`, in interning order.
    pub fn units_with(&self, value: A::Value) -> Vec<&CodeUnit> {
        let grade = value.grade();
        self.program
            .units()
            .iter()
            .filter(|unit| self.table[unit.id.index()] == grade)
            .collect()
    }

    pub fn counts(&self) -> ClassificationCounts {
        let mut counts = ClassificationCounts {
            open_interfaces: self.pending_interfaces.len(),
            ..Default::default()
        };
        for grade in &self.table {
            match grade {
                Grade::Strict => counts.strict += 1,
                Grade::Domain => counts.domain += 1,
                Grade::Not => counts.not += 1,
                Grade::Unsure => counts.unsure += 1,
                Grade::Unchecked => counts.unchecked += 1,
            }
        }
        counts
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn round_bound(&self) -> usize {
        self.max_rounds
            .unwrap_or_else(|| (4 * self.program.unit_count() + 4).max(MIN_ROUNDS))
    }

    fn round(&mut self) -> Result<bool> {
        let mut changed = false;

        for index in 0..self.table.len() {
            let unit = &self.program.units()[index];
            let id = unit.id;
            if unit.submitted && self.table[index] == Grade::Unchecked {
                self.classify_local(id);
                changed = true;
            }
        }

        for index in 0..self.table.len() {
            let id = self.program.units()[index].id;
            if self.table[index] == Grade::Unsure && !self.pending_interfaces.contains(&id) {
                changed |= self.propagate(id)?;
            }
        }

        let open: Vec<UnitId> = self.pending_interfaces.iter().copied().collect();
        for id in open {
            changed |= self.resolve_interface(id);
        }

        Ok(changed)
    }

    fn classify_local(&mut self, id: UnitId) {
        let index = id.index();
        let unit = self.program.unit(id);
        match A::classify_local(unit, &self.program) {
            LocalOutcome::Final { grade, finding } => {
                self.table[index] = grade;
                if let Some(finding) = finding {
                    self.diagnostics.record(
                        self.program.type_name(unit.owner),
                        &unit.qualified_name,
                        finding.reason,
                        finding.message,
                    );
                }
            }
            LocalOutcome::Dispatch => {
                self.table[index] = Grade::Unsure;
                self.pending_interfaces.insert(id);
            }
            LocalOutcome::Provisional(floor) if unit.has_calls() => {
                self.table[index] = Grade::Unsure;
                self.floors[index] = Some(floor);
            }
            LocalOutcome::Provisional(floor) => self.table[index] = floor,
        }
    }

    fn propagate(&mut self, id: UnitId) -> Result<bool> {
        let index = id.index();
        let unit = self.program.unit(id);
        if self.table[index] != Grade::Unsure {
            return Err(Error::invariant(format!(
                "call propagation reached {} while it is {:?}",
                unit.qualified_name, self.table[index]
            )));
        }
        let floor = self.floors[index].ok_or_else(|| {
            Error::invariant(format!(
                "call propagation reached {} without a local classification",
                unit.qualified_name
            ))
        })?;

        match evaluate_calls(unit, floor, &self.table, &self.program) {
            CallOutcome::Defer => Ok(false),
            CallOutcome::Absorbed { via } => {
                self.table[index] = Grade::Not;
                self.diagnostics.record(
                    self.program.type_name(unit.owner),
                    &unit.qualified_name,
                    ReasonCode::ImpureCall,
                    format!(
                        "{} calls {}, which is {}",
                        unit.qualified_name,
                        self.program.unit(via).qualified_name,
                        A::NOT_LABEL
                    ),
                );
                Ok(true)
            }
            CallOutcome::Settled(grade) => {
                self.table[index] = grade;
                Ok(true)
            }
        }
    }

    fn resolve_interface(&mut self, id: UnitId) -> bool {
        let index = id.index();
        let unit = self.program.unit(id);
        match resolve_dispatch(unit, &self.table, &self.program) {
            DispatchOutcome::Pending => false,
            DispatchOutcome::Resolved(grade) => {
                self.table[index] = grade;
                self.pending_interfaces.remove(&id);
                true
            }
            DispatchOutcome::Absorbed { via } => {
                self.table[index] = Grade::Not;
                self.pending_interfaces.remove(&id);
                self.diagnostics.record(
                    self.program.type_name(unit.owner),
                    &unit.qualified_name,
                    ReasonCode::ImpureCall,
                    format!(
                        "{} dispatches to {}, which is {}",
                        unit.qualified_name,
                        self.program.unit(via).qualified_name,
                        A::NOT_LABEL
                    ),
                );
                true
            }
        }
    }

    fn report_unresolved(&mut self) {
        if !self.table.contains(&Grade::Unsure) {
            return;
        }
        let cyclic = cyclic_units(&self.program);

        for unit in self.program.units() {
            if self.table[unit.id.index()] != Grade::Unsure {
                continue;
            }

            let blockers: Vec<UnitId> = if self.pending_interfaces.contains(&unit.id) {
                self.program
                    .overriders_of(unit)
                    .iter()
                    .copied()
                    .filter(|overrider| self.table[overrider.index()].is_temporary())
                    .collect()
            } else {
                undecided_callees(unit, &self.table)
            };
            let names: Vec<&str> = blockers
                .iter()
                .map(|&id| self.program.unit(id).qualified_name.as_str())
                .collect();

            let mut message = if names.is_empty() {
                format!("unsure about {}: no known overriders", unit.qualified_name)
            } else {
                format!(
                    "unsure about {} because of [{}]",
                    unit.qualified_name,
                    names.join(", ")
                )
            };
            if cyclic.contains(&unit.id) {
                message.push_str("; it lies on a call cycle");
            }

            self.diagnostics.record(
                self.program.type_name(unit.owner),
                &unit.qualified_name,
                ReasonCode::Unresolved,
                message,
            );
        }
    }

    fn preclassified(&self, unit: &CodeUnit) -> Grade {
        self.catalog
            .lookup(&unit.qualified_name)
            .unwrap_or_default()
    }

    /// Extend the table with units interned since the last sync.
    fn sync_table(&mut self) {
        for unit in &self.program.units()[self.table.len()..] {
            let grade = self.catalog.lookup(&unit.qualified_name).unwrap_or_default();
            self.table.push(grade);
            self.floors.push(None);
        }
    }

    fn reset_unit(&mut self, id: UnitId) {
        let grade = self.preclassified(self.program.unit(id));
        self.table[id.index()] = grade;
        self.floors[id.index()] = None;
        self.pending_interfaces.remove(&id);
    }

    /// Forget every derived classification; the graph changed since the
    /// last run.
    fn reset_table(&mut self) {
        self.sync_table();
        for index in 0..self.table.len() {
            let grade = self.preclassified(&self.program.units()[index]);
            self.table[index] = grade;
            self.floors[index] = None;
        }
        self.pending_interfaces.clear();
        self.diagnostics.clear();
    }
}
