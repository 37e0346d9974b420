//! Classification axes.
//!
//! An axis plugs three things into the generic engine: its public lattice
//! enum, its standard catalog and its local rule. Call propagation,
//! dispatch resolution and the fixed-point driver are shared.

use super::catalog::Catalog;
use super::lattice::{Determinism, Grade, Lattice, Purity};
use crate::diagnostics::ReasonCode;
use crate::graph::{CodeUnit, FieldId, Program};

/// Explanation attached to a unit finalized by its local rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub reason: ReasonCode,
    pub message: String,
}

/// Result of inspecting a unit's own structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalOutcome {
    /// Decided without looking at callees
    Final {
        grade: Grade,
        finding: Option<Finding>,
    },
    /// Interface or abstract unit, resolved through its overriders
    Dispatch,
    /// Body is acceptable so far; callees decide, never above this floor
    Provisional(Grade),
}

impl LocalOutcome {
    fn rejected(reason: ReasonCode, message: String) -> Self {
        LocalOutcome::Final {
            grade: Grade::Not,
            finding: Some(Finding { reason, message }),
        }
    }
}

pub trait Axis: Send + Sync + 'static {
    type Value: Lattice;

    const NAME: &'static str;

    /// Wording of the absorbing value, used in messages
    const NOT_LABEL: &'static str;

    fn standard_catalog() -> Catalog;

    /// Local rule for a submitted unit that is not yet finalized.
    fn classify_local(unit: &CodeUnit, program: &Program) -> LocalOutcome;
}

/// How a field relates to the unit touching it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldScope {
    /// Only ever written by constructors
    Stable,
    /// Written outside constructors by this unit alone
    SelfManaged,
    /// Written by some other non-constructor unit
    Shared,
}

fn write_scope(unit: &CodeUnit, field: FieldId, program: &Program) -> FieldScope {
    match program.writers_of(field) {
        [only] if *only == unit.id => FieldScope::SelfManaged,
        _ => FieldScope::Shared,
    }
}

fn read_scope(unit: &CodeUnit, field: FieldId, program: &Program) -> FieldScope {
    let mut mutators = program
        .writers_of(field)
        .iter()
        .filter(|&&writer| !program.unit(writer).is_constructor())
        .peekable();

    if mutators.peek().is_none() {
        return FieldScope::Stable;
    }
    if mutators.all(|&writer| writer == unit.id) {
        FieldScope::SelfManaged
    } else {
        FieldScope::Shared
    }
}

/// Side-effect freedom axis
#[derive(Debug, Clone, Copy, Default)]
pub struct PurityAxis;

impl Axis for PurityAxis {
    type Value = Purity;

    const NAME: &'static str = "purity";
    const NOT_LABEL: &'static str = "not side-effect free";

    fn standard_catalog() -> Catalog {
        Catalog::standard_purity()
    }

    fn classify_local(unit: &CodeUnit, program: &Program) -> LocalOutcome {
        // Returning nothing, a unit can only matter through a side channel
        if !unit.is_constructor() && unit.returns_void {
            return LocalOutcome::rejected(
                ReasonCode::VoidReturn,
                format!("{} returns void and can only act through side effects", unit.qualified_name),
            );
        }

        if unit.native {
            return LocalOutcome::rejected(
                ReasonCode::OpaqueOperation,
                format!("{} is an opaque operation, assumed impure", unit.qualified_name),
            );
        }

        if program.dispatches_virtually(unit) {
            return LocalOutcome::Dispatch;
        }

        // First assignment in a constructor is definitional
        if unit.is_constructor() {
            return LocalOutcome::Provisional(Grade::Strict);
        }

        let mut floor = Grade::Strict;
        for &field in &unit.writes {
            match write_scope(unit, field, program) {
                FieldScope::SelfManaged => floor = Grade::Domain,
                FieldScope::Stable | FieldScope::Shared => {
                    return LocalOutcome::rejected(
                        ReasonCode::FieldWrite,
                        format!("{} is writing to at least one property", unit.qualified_name),
                    );
                }
            }
        }
        LocalOutcome::Provisional(floor)
    }
}

/// Determinism axis
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterminismAxis;

impl Axis for DeterminismAxis {
    type Value = Determinism;

    const NAME: &'static str = "determinism";
    const NOT_LABEL: &'static str = "non-deterministic";

    fn standard_catalog() -> Catalog {
        Catalog::standard_determinism()
    }

    fn classify_local(unit: &CodeUnit, program: &Program) -> LocalOutcome {
        if unit.native {
            return LocalOutcome::rejected(
                ReasonCode::OpaqueOperation,
                format!(
                    "{} is an opaque operation, assumed non-deterministic",
                    unit.qualified_name
                ),
            );
        }

        if program.dispatches_virtually(unit) {
            return LocalOutcome::Dispatch;
        }

        // No result to vary; the calls still decide
        if !unit.is_constructor() && unit.returns_void {
            return LocalOutcome::Provisional(Grade::Strict);
        }

        let mut floor = Grade::Strict;
        for &field in &unit.reads {
            match read_scope(unit, field, program) {
                FieldScope::Stable => {}
                FieldScope::SelfManaged => floor = Grade::Domain,
                FieldScope::Shared => {
                    let field = program.field(field);
                    return LocalOutcome::rejected(
                        ReasonCode::FieldRead,
                        format!(
                            "{} reads mutable state {}.{}",
                            unit.qualified_name, field.owner, field.name
                        ),
                    );
                }
            }
        }
        LocalOutcome::Provisional(floor)
    }
}
