use funcore::classification::{Catalog, Lattice, Purity, PuritySession};
use funcore::{ProgramGraph, ReasonCode, UnitDecl};
use proptest::prelude::*;
use std::collections::BTreeMap;

const IMPURE_LIBRARY: &str = "java.io.File.delete()";
const UNKNOWN_LIBRARY: &str = "lib.Unknown.call()";

#[derive(Debug, Clone)]
struct UnitShape {
    void: bool,
    native: bool,
    write: Option<usize>,
    calls: Vec<usize>,
}

fn unit_name(index: usize, unit_count: usize) -> String {
    match index.checked_sub(unit_count) {
        None => format!("app.U{index}.f()"),
        Some(0) => IMPURE_LIBRARY.to_string(),
        Some(_) => UNKNOWN_LIBRARY.to_string(),
    }
}

fn owner_of(name: &str) -> &str {
    name.split('(')
        .next()
        .and_then(|head| head.rsplit_once('.'))
        .map(|(owner, _)| owner)
        .unwrap_or(name)
}

fn unit_shape(unit_count: usize) -> impl Strategy<Value = UnitShape> {
    (
        prop::bool::weighted(0.15),
        prop::bool::weighted(0.05),
        prop::option::weighted(0.3, 0..3usize),
        prop::collection::vec(0..unit_count + 2, 0..4),
    )
        .prop_map(|(void, native, write, calls)| UnitShape {
            void,
            native,
            write,
            calls,
        })
}

fn program_shapes() -> impl Strategy<Value = Vec<UnitShape>> {
    (1..12usize).prop_flat_map(|n| prop::collection::vec(unit_shape(n), n))
}

fn build_units(shapes: &[UnitShape]) -> Vec<UnitDecl> {
    let n = shapes.len();
    shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            let mut decl = UnitDecl::method(format!("app.U{index}"), "f");
            decl.returns_void = shape.void;
            decl.native = shape.native;
            if let Some(field) = shape.write {
                decl = decl.writes("app.Shared", format!("f{field}"));
            }
            for &target in &shape.calls {
                let name = unit_name(target, n);
                decl = decl.calls(owner_of(&name).to_string(), name);
            }
            decl
        })
        .collect()
}

fn classify(units: &[UnitDecl], max_rounds: Option<usize>) -> (PuritySession, bool) {
    let mut session = PuritySession::new(Catalog::standard_purity(), Vec::<String>::new());
    if let Some(bound) = max_rounds {
        session = session.with_max_rounds(bound);
    }
    session.load(&ProgramGraph {
        types: Vec::new(),
        units: units.to_vec(),
    });
    let summary = session.run().expect("run succeeds");
    (session, summary.converged)
}

fn by_name(session: &PuritySession) -> BTreeMap<String, Purity> {
    session
        .program()
        .units()
        .iter()
        .map(|unit| (unit.qualified_name.clone(), session.classification_by_id(unit.id)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_rerun_is_idempotent(shapes in program_shapes()) {
        let units = build_units(&shapes);
        let (mut session, _) = classify(&units, None);
        let first = by_name(&session);
        let first_diagnostics = session.violations().to_vec();

        session.run().unwrap();
        prop_assert_eq!(by_name(&session), first);
        prop_assert_eq!(session.violations(), first_diagnostics.as_slice());
    }

    #[test]
    fn prop_final_values_never_change(shapes in program_shapes(), bound in 1..4usize) {
        let units = build_units(&shapes);
        let (partial, _) = classify(&units, Some(bound));
        let (full, _) = classify(&units, None);
        let full = by_name(&full);

        for (name, value) in by_name(&partial) {
            if value.is_final() {
                prop_assert_eq!(full[&name], value, "{} changed after round {}", name, bound);
            }
        }
    }

    #[test]
    fn prop_lattice_is_consistent(shapes in program_shapes()) {
        let units = build_units(&shapes);
        let (session, _) = classify(&units, None);
        let program = session.program();

        for unit in program.units().iter().filter(|u| u.submitted) {
            let value = session.classification_by_id(unit.id);
            if value == Purity::StrictFree {
                prop_assert!(value.is_at_least(Purity::DomainFree));
            }
            if value.is_at_least(Purity::DomainFree) {
                for call in &unit.calls {
                    for &target in &call.targets {
                        let callee = session.classification_by_id(target);
                        prop_assert!(callee.is_at_least(Purity::DomainFree));
                        if value == Purity::StrictFree {
                            prop_assert_eq!(callee, Purity::StrictFree);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn prop_submission_order_does_not_matter(
        (units, shuffled) in program_shapes().prop_flat_map(|shapes| {
            let units = build_units(&shapes);
            (Just(units.clone()), Just(units).prop_shuffle())
        })
    ) {
        let (original, _) = classify(&units, None);
        let (reordered, _) = classify(&shuffled, None);
        prop_assert_eq!(by_name(&original), by_name(&reordered));
    }

    #[test]
    fn prop_every_run_terminates_with_explained_leftovers(shapes in program_shapes()) {
        let units = build_units(&shapes);
        let (session, converged) = classify(&units, None);
        prop_assert!(converged);

        for unit in session.program().units() {
            if session.classification_by_id(unit.id) == Purity::Unsure {
                prop_assert!(session
                    .diagnostics()
                    .for_unit(&unit.qualified_name)
                    .any(|d| d.reason == ReasonCode::Unresolved));
            }
        }
    }
}

#[test]
fn test_long_ring_terminates_unresolved() {
    let n = 200;
    let units: Vec<UnitDecl> = (0..n)
        .map(|i| {
            let next = (i + 1) % n;
            UnitDecl::method(format!("app.U{i}"), "f")
                .calls(format!("app.U{next}"), format!("app.U{next}.f()"))
        })
        .collect();
    let (session, converged) = classify(&units, None);
    assert!(converged);
    assert_eq!(session.counts().unsure, n);
}

#[test]
fn test_long_chain_resolves_within_default_bound() {
    let n = 300;
    // Submitted leaf-last so each round can only settle one more link
    let units: Vec<UnitDecl> = (0..n)
        .map(|i| {
            let decl = UnitDecl::method(format!("app.U{i}"), "f");
            if i + 1 < n {
                decl.calls(format!("app.U{}", i + 1), format!("app.U{}.f()", i + 1))
            } else {
                decl
            }
        })
        .collect();
    let (session, converged) = classify(&units, None);
    assert!(converged);
    assert_eq!(session.counts().strict, n);
}
