//! Dependency direction: the core must not reach into the shell.

use crate::graph::{Program, UnitId};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Call,
    Construction,
    FieldAccess,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DependencyKind::Call => "calls",
            DependencyKind::Construction => "constructs",
            DependencyKind::FieldAccess => "accesses",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DependencyViolation {
    /// Core unit holding the edge
    pub unit: String,
    pub kind: DependencyKind,
    /// Shell type or member the edge points at
    pub target: String,
}

impl fmt::Display for DependencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.unit, self.kind, self.target)
    }
}

pub(crate) fn matches_prefix(prefixes: &[String], name: &str) -> bool {
    prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
}

/// Every edge from a submitted core unit to an owner under a shell prefix.
pub fn find_violations(program: &Program, core: &[String], shell: &[String]) -> Vec<DependencyViolation> {
    if core.is_empty() || shell.is_empty() {
        return Vec::new();
    }

    let mut violations = BTreeSet::new();
    let in_shell = |id: UnitId| matches_prefix(shell, program.owner_name(id));

    for unit in program.units() {
        if !unit.submitted || !matches_prefix(core, program.type_name(unit.owner)) {
            continue;
        }
        let mut report = |kind, target: &str| {
            violations.insert(DependencyViolation {
                unit: unit.qualified_name.clone(),
                kind,
                target: target.to_string(),
            });
        };

        // one violation per edge: shell targets when any, else the declared owner
        for call in &unit.calls {
            let mut shell_targets = call.targets.iter().copied().filter(|&t| in_shell(t)).peekable();
            if shell_targets.peek().is_none() {
                if matches_prefix(shell, program.type_name(call.owner)) {
                    report(DependencyKind::Call, program.type_name(call.owner));
                }
                continue;
            }
            for target in shell_targets {
                report(DependencyKind::Call, &program.unit(target).qualified_name);
            }
        }
        for &ctor in unit.constructs.iter().filter(|&&c| in_shell(c)) {
            report(DependencyKind::Construction, &program.unit(ctor).qualified_name);
        }
        for &field in unit.reads.iter().chain(&unit.writes) {
            let field = program.field(field);
            if matches_prefix(shell, &field.owner) {
                report(DependencyKind::FieldAccess, &format!("{}.{}", field.owner, field.name));
            }
        }
    }
    violations.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::UnitDecl;

    fn prefixes(p: &[&str]) -> Vec<String> {
        p.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_core_calling_shell_is_reported() {
        let mut program = Program::new();
        program.submit(
            &UnitDecl::method("app.core.Talks", "load").calls("app.shell.Repo", "app.shell.Repo.all()"),
        );
        program.submit(&UnitDecl::method("app.shell.Repo", "all"));
        program.freeze();

        let violations = find_violations(&program, &prefixes(&["app.core."]), &prefixes(&["app.shell."]));
        assert_eq!(
            violations,
            vec![DependencyViolation {
                unit: "app.core.Talks.load()".into(),
                kind: DependencyKind::Call,
                target: "app.shell.Repo.all()".into(),
            }]
        );
    }

    #[test]
    fn test_shell_interface_without_shell_targets_reports_owner() {
        let mut program = Program::new();
        program.submit(&UnitDecl::method("app.core.Talks", "save").calls_any(
            "app.shell.Store",
            ["app.core.MemoryStore.put()"],
        ));
        program.freeze();

        let violations = find_violations(&program, &prefixes(&["app.core."]), &prefixes(&["app.shell."]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].target, "app.shell.Store");
    }

    #[test]
    fn test_shell_calling_core_is_fine() {
        let mut program = Program::new();
        program.submit(
            &UnitDecl::method("app.shell.Ui", "show").calls("app.core.Talks", "app.core.Talks.all()"),
        );
        program.freeze();
        assert!(find_violations(&program, &prefixes(&["app.core."]), &prefixes(&["app.shell."])).is_empty());
    }

    #[test]
    fn test_field_and_construction_edges() {
        let mut program = Program::new();
        program.submit(
            &UnitDecl::method("app.core.Cfg", "read")
                .reads("app.shell.Env", "home")
                .constructs("app.shell.Env.<init>()"),
        );
        program.freeze();
        let violations = find_violations(&program, &prefixes(&["app.core."]), &prefixes(&["app.shell."]));
        let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![DependencyKind::Construction, DependencyKind::FieldAccess]);
    }
}
