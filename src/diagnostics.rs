//! Human-readable explanations collected during a classification run.
//!
//! Records are scoped: only units whose owner name starts with one of the
//! reporting prefixes are kept. Out-of-scope units (library internals) still
//! get classified, they are just not reported.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReasonCode {
    VoidReturn,
    OpaqueOperation,
    FieldWrite,
    FieldRead,
    ImpureCall,
    Unresolved,
    NonConvergence,
}

impl ReasonCode {
    /// Reasons describing the run rather than a single unit
    pub fn is_run_level(self) -> bool {
        self == ReasonCode::NonConvergence
    }

    /// Reasons recomputed from scratch at the end of every run
    pub fn is_end_of_run(self) -> bool {
        matches!(self, ReasonCode::Unresolved | ReasonCode::NonConvergence)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReasonCode::VoidReturn => "void-return",
            ReasonCode::OpaqueOperation => "opaque-operation",
            ReasonCode::FieldWrite => "field-write",
            ReasonCode::FieldRead => "field-read",
            ReasonCode::ImpureCall => "impure-call",
            ReasonCode::Unresolved => "unresolved",
            ReasonCode::NonConvergence => "non-convergence",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Owning type; empty for run-level records
    pub owner: String,
    /// Qualified unit name; empty for run-level records
    pub unit: String,
    pub reason: ReasonCode,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    scope: Vec<String>,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Collector reporting every unit
    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn scoped<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope: prefixes.into_iter().map(Into::into).collect(),
            entries: Vec::new(),
        }
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn in_scope(&self, owner: &str) -> bool {
        self.scope.is_empty() || self.scope.iter().any(|p| owner.starts_with(p.as_str()))
    }

    /// Record a unit-level finding; dropped when the owner is out of scope.
    pub fn record(
        &mut self,
        owner: &str,
        unit: &str,
        reason: ReasonCode,
        message: impl Into<String>,
    ) -> bool {
        if !self.in_scope(owner) {
            return false;
        }
        self.entries.push(Diagnostic {
            owner: owner.to_string(),
            unit: unit.to_string(),
            reason,
            message: message.into(),
        });
        true
    }

    pub fn record_run_level(&mut self, reason: ReasonCode, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            owner: String::new(),
            unit: String::new(),
            reason,
            message: message.into(),
        });
    }

    pub(crate) fn clear_end_of_run(&mut self) {
        self.entries.retain(|d| !d.reason.is_end_of_run());
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn with_reason(&self, reason: ReasonCode) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.reason == reason)
    }

    pub fn for_unit<'a>(&'a self, unit: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.entries.iter().filter(move |d| d.unit == unit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_filters_library_units() {
        let mut diagnostics = Diagnostics::scoped(["hamburg.core."]);
        assert!(diagnostics.record(
            "hamburg.core.Talks",
            "hamburg.core.Talks.add()",
            ReasonCode::FieldWrite,
            "writes",
        ));
        assert!(!diagnostics.record(
            "java.util.ArrayList",
            "java.util.ArrayList.add(java.lang.Object)",
            ReasonCode::FieldWrite,
            "writes",
        ));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_unscoped_reports_everything() {
        let mut diagnostics = Diagnostics::unscoped();
        assert!(diagnostics.record("x.Y", "x.Y.z()", ReasonCode::VoidReturn, "void"));
        assert_eq!(diagnostics.with_reason(ReasonCode::VoidReturn).count(), 1);
    }

    #[test]
    fn test_run_level_records_bypass_scope() {
        let mut diagnostics = Diagnostics::scoped(["app."]);
        diagnostics.record_run_level(ReasonCode::NonConvergence, "bound hit");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.entries()[0].reason.is_run_level());
    }

    #[test]
    fn test_clear_end_of_run_keeps_unit_findings() {
        let mut diagnostics = Diagnostics::unscoped();
        diagnostics.record("a.B", "a.B.c()", ReasonCode::ImpureCall, "calls");
        diagnostics.record("a.B", "a.B.d()", ReasonCode::Unresolved, "unsure");
        diagnostics.record_run_level(ReasonCode::NonConvergence, "bound hit");
        diagnostics.clear_end_of_run();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].reason, ReasonCode::ImpureCall);
    }
}
