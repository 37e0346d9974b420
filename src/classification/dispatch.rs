//! Dispatch resolver for interface and abstract units.

use super::lattice::Grade;
use crate::graph::{CodeUnit, Program, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Overriders disagree or are undecided; stay pending
    Pending,
    Resolved(Grade),
    /// Resolved not-free because of this overrider
    Absorbed { via: UnitId },
}

/// Resolve an interface unit from every concrete overrider of its signature.
pub fn resolve_dispatch(unit: &CodeUnit, table: &[Grade], program: &Program) -> DispatchOutcome {
    let overriders = program.overriders_of(unit);
    if overriders.is_empty() {
        return DispatchOutcome::Pending;
    }

    let grade = |id: &UnitId| table[id.index()];

    if overriders.iter().all(|id| grade(id) == Grade::Strict) {
        DispatchOutcome::Resolved(Grade::Strict)
    } else if overriders.iter().all(|id| grade(id).is_at_least(Grade::Domain)) {
        DispatchOutcome::Resolved(Grade::Domain)
    } else if let Some(&via) = overriders.iter().find(|id| grade(id) == Grade::Not) {
        DispatchOutcome::Absorbed { via }
    } else {
        DispatchOutcome::Pending
    }
}
