//! Call-propagation rule.
//!
//! A pending unit is decided from the classifications of everything it
//! calls. Undecided callees defer it, a not-free callee absorbs it unless the
//! call goes to a receiver the unit constructed itself, and domain-free
//! callees lower its floor.

use super::lattice::Grade;
use crate::graph::{CodeUnit, Program, TypeId, UnitId};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// At least one callee is still undecided
    Defer,
    /// Calls a not-free unit outside the carve-out
    Absorbed { via: UnitId },
    /// Every callee decided; finalize at this grade
    Settled(Grade),
}

/// Owners of the constructors a unit invokes locally.
pub fn locally_constructed(unit: &CodeUnit, program: &Program) -> HashSet<TypeId> {
    unit.constructs
        .iter()
        .map(|&ctor| program.unit(ctor).owner)
        .collect()
}

/// Evaluate a pending unit against the current table.
///
/// Mutating a value allocated inside the unit that never escapes is not an
/// observable effect, so not-free calls whose declared owner the unit
/// constructed locally are exempt.
pub fn evaluate_calls(unit: &CodeUnit, floor: Grade, table: &[Grade], program: &Program) -> CallOutcome {
    let constructed = locally_constructed(unit, program);
    let mut floor = floor;
    let mut absorbed_by = None;

    for call in &unit.calls {
        let exempt = constructed.contains(&call.owner);
        for &target in &call.targets {
            match table[target.index()] {
                Grade::Unchecked | Grade::Unsure => return CallOutcome::Defer,
                Grade::Not if !exempt => {
                    absorbed_by.get_or_insert(target);
                }
                Grade::Not => {}
                Grade::Domain => floor = floor.weaken_to(Grade::Domain),
                Grade::Strict => {}
            }
        }
    }

    match absorbed_by {
        Some(via) => CallOutcome::Absorbed { via },
        None => CallOutcome::Settled(floor),
    }
}

/// Callees that keep a unit undecided
pub fn undecided_callees(unit: &CodeUnit, table: &[Grade]) -> Vec<UnitId> {
    let mut seen = HashSet::new();
    unit.calls
        .iter()
        .flat_map(|call| call.targets.iter().copied())
        .filter(|target| table[target.index()].is_temporary())
        .filter(|target| seen.insert(*target))
        .collect()
}
