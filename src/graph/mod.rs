//! Interned program graph.
//!
//! Code units and types are interned to dense ids as they are submitted, so
//! classification state can live in plain index-addressed vectors. Units
//! that are only referenced (call or construction targets never submitted)
//! are interned too and flagged as external.
//!
//! Whole-program indexes (field writers, dispatch registry)
//! are computed by [`Program::freeze`] once collection is complete.

mod cycles;
mod dispatch;
pub mod types;

pub use cycles::cyclic_units;
pub use dispatch::{DispatchKey, DispatchRegistry};
pub use types::{
    qualified_name, CallEdge, DispatchKind, FieldRef, ProgramGraph, TypeDecl, UnitDecl, UnitKind,
};

use std::collections::HashMap;
use types::split_qualified_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u32);

impl UnitId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u32);

impl FieldId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: String,
    pub dispatch: DispatchKind,
    pub supertypes: Vec<TypeId>,
    pub declared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Declared owner of the call target
    pub owner: TypeId,
    pub targets: Vec<UnitId>,
}

/// A callable unit with every edge resolved to ids
#[derive(Debug, Clone)]
pub struct CodeUnit {
    pub id: UnitId,
    pub qualified_name: String,
    pub name: String,
    pub parameters: Vec<String>,
    pub kind: UnitKind,
    pub owner: TypeId,
    pub native: bool,
    pub is_abstract: bool,
    pub returns_void: bool,
    pub calls: Vec<CallSite>,
    pub writes: Vec<FieldId>,
    pub reads: Vec<FieldId>,
    pub constructs: Vec<UnitId>,
    /// False for units known only as call or construction targets
    pub submitted: bool,
}

impl CodeUnit {
    pub fn is_constructor(&self) -> bool {
        self.kind == UnitKind::Constructor
    }

    pub fn has_calls(&self) -> bool {
        self.calls.iter().any(|call| !call.targets.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    units: Vec<CodeUnit>,
    unit_index: HashMap<String, UnitId>,
    types: Vec<TypeInfo>,
    type_index: HashMap<String, TypeId>,
    fields: Vec<FieldRef>,
    field_index: HashMap<FieldRef, FieldId>,
    field_writers: Vec<Vec<UnitId>>,
    dispatch: DispatchRegistry,
    frozen: bool,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: &ProgramGraph) -> Self {
        let mut program = Self::new();
        program.load(graph);
        program
    }

    pub fn load(&mut self, graph: &ProgramGraph) {
        for decl in &graph.types {
            self.declare_type(decl);
        }
        for decl in &graph.units {
            self.submit(decl);
        }
    }

    pub fn declare_type(&mut self, decl: &TypeDecl) -> TypeId {
        let id = self.intern_type(&decl.name);
        let supertypes = decl
            .supertypes
            .iter()
            .map(|name| self.intern_type(name))
            .collect();
        let info = &mut self.types[id.index()];
        info.dispatch = decl.dispatch;
        info.supertypes = supertypes;
        info.declared = true;
        self.frozen = false;
        id
    }

    /// Intern a submitted unit, replacing any earlier declaration of the
    /// same qualified name.
    pub fn submit(&mut self, decl: &UnitDecl) -> UnitId {
        let owner = self.intern_type(&decl.owner);
        let id = self.intern_unit(&decl.qualified_name(), owner);

        let calls = decl
            .calls
            .iter()
            .map(|edge| {
                let call_owner = self.intern_type(&edge.owner);
                let targets = edge
                    .targets
                    .iter()
                    .map(|target| self.intern_reference(target))
                    .collect();
                CallSite {
                    owner: call_owner,
                    targets,
                }
            })
            .collect();
        let writes = decl.writes.iter().map(|f| self.intern_field(f)).collect();
        let reads = decl.reads.iter().map(|f| self.intern_field(f)).collect();
        let constructs = decl
            .constructs
            .iter()
            .map(|target| self.intern_reference(target))
            .collect();

        let unit = &mut self.units[id.index()];
        unit.name = decl.name.clone();
        unit.parameters = decl.parameters.clone();
        unit.kind = decl.kind;
        unit.owner = owner;
        unit.native = decl.native;
        unit.is_abstract = decl.is_abstract;
        unit.returns_void = decl.returns_void;
        unit.calls = calls;
        unit.writes = writes;
        unit.reads = reads;
        unit.constructs = constructs;
        unit.submitted = true;
        self.frozen = false;
        id
    }

    /// Compute whole-program indexes. Cheap to call repeatedly; only does
    /// work after new submissions.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }

        let mut writers = vec![Vec::new(); self.fields.len()];
        for unit in self.units.iter().filter(|u| u.submitted) {
            for field in &unit.writes {
                writers[field.index()].push(unit.id);
            }
        }
        for list in &mut writers {
            list.sort_unstable();
            list.dedup();
        }
        self.field_writers = writers;
        self.dispatch = DispatchRegistry::build(self);
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn units(&self) -> &[CodeUnit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> &CodeUnit {
        &self.units[id.index()]
    }

    pub fn unit_id(&self, qualified_name: &str) -> Option<UnitId> {
        self.unit_index.get(qualified_name).copied()
    }

    pub fn type_info(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.index()]
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        &self.types[id.index()].name
    }

    pub fn owner_name(&self, unit: UnitId) -> &str {
        self.type_name(self.unit(unit).owner)
    }

    pub fn field(&self, id: FieldId) -> &FieldRef {
        &self.fields[id.index()]
    }

    /// Submitted units writing a field. Empty until [`Program::freeze`].
    pub fn writers_of(&self, field: FieldId) -> &[UnitId] {
        self.field_writers
            .get(field.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a unit is resolved through its overriders rather than its body
    pub fn dispatches_virtually(&self, unit: &CodeUnit) -> bool {
        unit.is_abstract || self.type_info(unit.owner).dispatch == DispatchKind::Interface
    }

    /// Concrete overriders of an interface or abstract unit
    pub fn overriders_of(&self, unit: &CodeUnit) -> &[UnitId] {
        self.dispatch.overriders_of(unit)
    }

    /// Every transitive supertype of `ty`, excluding `ty` itself
    pub fn ancestors(&self, ty: TypeId) -> Vec<TypeId> {
        let mut seen = vec![false; self.types.len()];
        let mut stack = self.types[ty.index()].supertypes.clone();
        let mut ancestors = Vec::new();
        seen[ty.index()] = true;

        while let Some(next) = stack.pop() {
            if seen[next.index()] {
                continue;
            }
            seen[next.index()] = true;
            ancestors.push(next);
            stack.extend(self.types[next.index()].supertypes.iter().copied());
        }
        ancestors
    }

    fn intern_type(&mut self, name: &str) -> TypeId {
        if let Some(&id) = self.type_index.get(name) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeInfo {
            name: name.to_string(),
            dispatch: DispatchKind::Concrete,
            supertypes: Vec::new(),
            declared: false,
        });
        self.type_index.insert(name.to_string(), id);
        id
    }

    /// Intern a call or construction target under the owner named in its
    /// own qualified name, not the declared owner of the call site.
    fn intern_reference(&mut self, qualified: &str) -> UnitId {
        let owner = self.intern_type(owner_of_unit(qualified));
        self.intern_unit(qualified, owner)
    }

    fn intern_unit(&mut self, qualified: &str, owner: TypeId) -> UnitId {
        if let Some(&id) = self.unit_index.get(qualified) {
            return id;
        }
        let id = UnitId(self.units.len() as u32);
        let (name, parameters) = split_qualified_name(qualified, &self.types[owner.index()].name);
        let kind = if name == types::CONSTRUCTOR_NAME {
            UnitKind::Constructor
        } else {
            UnitKind::Method
        };
        self.units.push(CodeUnit {
            id,
            qualified_name: qualified.to_string(),
            name,
            parameters,
            kind,
            owner,
            native: false,
            is_abstract: false,
            returns_void: false,
            calls: Vec::new(),
            writes: Vec::new(),
            reads: Vec::new(),
            constructs: Vec::new(),
            submitted: false,
        });
        self.unit_index.insert(qualified.to_string(), id);
        self.frozen = false;
        id
    }

    fn intern_field(&mut self, field: &FieldRef) -> FieldId {
        if let Some(&id) = self.field_index.get(field) {
            return id;
        }
        self.intern_type(&field.owner);
        let id = FieldId(self.fields.len() as u32);
        self.fields.push(field.clone());
        self.field_index.insert(field.clone(), id);
        id
    }
}

/// `java.util.ArrayList.<init>(int)` -> `java.util.ArrayList`
fn owner_of_unit(qualified: &str) -> &str {
    let head = qualified.split('(').next().unwrap_or(qualified);
    head.rsplit_once('.').map(|(owner, _)| owner).unwrap_or(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_references_are_interned_as_external_units() {
        let mut program = Program::new();
        let id = program.submit(
            &UnitDecl::method("app.Core", "size").calls("java.util.List", "java.util.List.size()"),
        );

        assert_eq!(program.unit_count(), 2);
        assert!(program.unit(id).submitted);

        let target = program.unit_id("java.util.List.size()").unwrap();
        let external = program.unit(target);
        assert!(!external.submitted);
        assert_eq!(external.name, "size");
        assert_eq!(program.owner_name(target), "java.util.List");
    }

    #[test]
    fn test_resubmission_replaces_declaration() {
        let mut program = Program::new();
        let first = program.submit(&UnitDecl::method("app.Core", "get").writes("app.Core", "x"));
        let second = program.submit(&UnitDecl::method("app.Core", "get"));

        assert_eq!(first, second);
        assert!(program.unit(first).writes.is_empty());
    }

    #[test]
    fn test_field_writers_index() {
        let mut program = Program::new();
        let ctor = program.submit(&UnitDecl::constructor("app.Core").writes("app.Core", "talks"));
        let setter = program.submit(
            &UnitDecl::method("app.Core", "setTalks")
                .params(["java.util.List"])
                .writes("app.Core", "talks"),
        );
        program.freeze();

        let field = program.unit(setter).writes[0];
        assert_eq!(program.writers_of(field), &[ctor, setter]);
    }

    #[test]
    fn test_construction_targets_owner() {
        let mut program = Program::new();
        let id = program.submit(
            &UnitDecl::method("app.Core", "copy")
                .constructs("java.util.ArrayList.<init>(java.util.Collection)"),
        );
        let ctor = program.unit(id).constructs[0];
        assert_eq!(program.owner_name(ctor), "java.util.ArrayList");
        assert!(program.unit(ctor).is_constructor());
    }

    #[test]
    fn test_call_targets_take_owner_from_their_own_name() {
        let mut program = Program::new();
        program.declare_type(&TypeDecl::interface("geo.Shape"));
        program.declare_type(&TypeDecl::concrete("geo.Circle").extending("geo.Shape"));
        let id = program.submit(&UnitDecl::method("geo.Report", "total").calls_any(
            "geo.Shape",
            ["geo.Square.area()", "geo.Circle.area()"],
        ));

        let call = &program.unit(id).calls[0];
        assert_eq!(program.type_name(call.owner), "geo.Shape");
        let circle = program.unit(call.targets[1]);
        assert_eq!(program.owner_name(circle.id), "geo.Circle");
        assert_eq!(circle.name, "area");
        assert!(circle.parameters.is_empty());
    }

    #[test]
    fn test_ancestors_are_transitive_and_cycle_safe() {
        let mut program = Program::new();
        program.declare_type(&TypeDecl::interface("app.Shape"));
        program.declare_type(&TypeDecl::abstract_class("app.Polygon").extending("app.Shape"));
        let square = program.declare_type(&TypeDecl::concrete("app.Square").extending("app.Polygon"));
        // a malformed loop must not hang
        program.declare_type(&TypeDecl::interface("app.Shape").extending("app.Square"));

        let names: Vec<&str> = program
            .ancestors(square)
            .into_iter()
            .map(|t| program.type_name(t))
            .collect();
        assert_eq!(names, vec!["app.Polygon", "app.Shape"]);
    }
}
