//! Registry of concrete overriders for virtually dispatched units.
//!
//! Built once per freeze: every concrete unit is registered under each
//! transitive supertype of its owner, keyed by name and parameter
//! signature. Resolving an interface unit is then a single lookup instead
//! of a scan over all subclasses.

use super::{CodeUnit, DispatchKind, Program, TypeId, UnitId};
use im::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    pub owner: TypeId,
    pub name: String,
    pub parameters: Vec<String>,
}

impl DispatchKey {
    pub fn of(unit: &CodeUnit) -> Self {
        Self {
            owner: unit.owner,
            name: unit.name.clone(),
            parameters: unit.parameters.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DispatchRegistry {
    overriders: HashMap<DispatchKey, Vec<UnitId>>,
}

impl DispatchRegistry {
    pub fn build(program: &Program) -> Self {
        let mut overriders: HashMap<DispatchKey, Vec<UnitId>> = HashMap::new();

        for unit in program.units().iter().filter(|u| is_concrete(program, u)) {
            for ancestor in program.ancestors(unit.owner) {
                let key = DispatchKey {
                    owner: ancestor,
                    name: unit.name.clone(),
                    parameters: unit.parameters.clone(),
                };
                overriders.entry(key).or_default().push(unit.id);
            }
        }

        Self { overriders }
    }

    pub fn overriders_of(&self, unit: &CodeUnit) -> &[UnitId] {
        self.overriders
            .get(&DispatchKey::of(unit))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.overriders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overriders.is_empty()
    }
}

fn is_concrete(program: &Program, unit: &CodeUnit) -> bool {
    !unit.is_constructor()
        && !unit.is_abstract
        && program.type_info(unit.owner).dispatch != DispatchKind::Interface
}
