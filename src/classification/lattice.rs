//! Classification lattice shared by every axis.
//!
//! The engine works on [`Grade`]; each axis exposes its own public enum
//! (e.g. [`Purity`]) that maps one-to-one onto it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-independent classification value.
///
/// `Unchecked` and `Unsure` are working markers. `Not`, `Domain` and
/// `Strict` are final; `Not` is absorbing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Grade {
    #[default]
    Unchecked,
    Unsure,
    Not,
    Domain,
    Strict,
}

impl Grade {
    pub fn is_temporary(self) -> bool {
        matches!(self, Grade::Unchecked | Grade::Unsure)
    }

    pub fn is_final(self) -> bool {
        !self.is_temporary()
    }

    /// The at-least-as-strong-as relation.
    ///
    /// `Strict` implies `Domain`; every other value only implies itself,
    /// except `Unsure`, which also covers `Unchecked`.
    pub fn is_at_least(self, other: Grade) -> bool {
        matches!(
            (self, other),
            (Grade::Strict, Grade::Strict | Grade::Domain)
                | (Grade::Domain, Grade::Domain)
                | (Grade::Not, Grade::Not)
                | (Grade::Unsure, Grade::Unsure | Grade::Unchecked)
                | (Grade::Unchecked, Grade::Unchecked)
        )
    }

    /// Weaker of two provisional floors (`Strict` or `Domain`).
    pub fn weaken_to(self, other: Grade) -> Grade {
        self.min(other)
    }
}

/// Public classification enum of one axis
pub trait Lattice:
    Copy + Eq + fmt::Debug + fmt::Display + Serialize + Send + Sync + 'static
{
    fn from_grade(grade: Grade) -> Self;

    fn grade(self) -> Grade;

    fn is_at_least(self, other: Self) -> bool {
        self.grade().is_at_least(other.grade())
    }

    fn is_final(self) -> bool {
        self.grade().is_final()
    }
}

/// Side-effect freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purity {
    Unchecked,
    Unsure,
    NotFree,
    DomainFree,
    StrictFree,
}

impl Lattice for Purity {
    fn from_grade(grade: Grade) -> Self {
        match grade {
            Grade::Unchecked => Purity::Unchecked,
            Grade::Unsure => Purity::Unsure,
            Grade::Not => Purity::NotFree,
            Grade::Domain => Purity::DomainFree,
            Grade::Strict => Purity::StrictFree,
        }
    }

    fn grade(self) -> Grade {
        match self {
            Purity::Unchecked => Grade::Unchecked,
            Purity::Unsure => Grade::Unsure,
            Purity::NotFree => Grade::Not,
            Purity::DomainFree => Grade::Domain,
            Purity::StrictFree => Grade::Strict,
        }
    }
}

impl fmt::Display for Purity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Purity::Unchecked => "unchecked (SEF)",
            Purity::Unsure => "unsure (SEF)",
            Purity::NotFree => "not SEF",
            Purity::DomainFree => "domain SEF",
            Purity::StrictFree => "strictly SEF",
        };
        f.write_str(label)
    }
}

/// Determinism of results for equal inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Determinism {
    Unchecked,
    Unsure,
    NotDeterministic,
    DomainDeterministic,
    StrictlyDeterministic,
}

impl Lattice for Determinism {
    fn from_grade(grade: Grade) -> Self {
        match grade {
            Grade::Unchecked => Determinism::Unchecked,
            Grade::Unsure => Determinism::Unsure,
            Grade::Not => Determinism::NotDeterministic,
            Grade::Domain => Determinism::DomainDeterministic,
            Grade::Strict => Determinism::StrictlyDeterministic,
        }
    }

    fn grade(self) -> Grade {
        match self {
            Determinism::Unchecked => Grade::Unchecked,
            Determinism::Unsure => Grade::Unsure,
            Determinism::NotDeterministic => Grade::Not,
            Determinism::DomainDeterministic => Grade::Domain,
            Determinism::StrictlyDeterministic => Grade::Strict,
        }
    }
}

impl fmt::Display for Determinism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Determinism::Unchecked => "unchecked (DET)",
            Determinism::Unsure => "unsure (DET)",
            Determinism::NotDeterministic => "not DET",
            Determinism::DomainDeterministic => "domain DET",
            Determinism::StrictlyDeterministic => "strictly DET",
        };
        f.write_str(label)
    }
}
