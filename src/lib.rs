//! Side-effect freedom and determinism classification for a functional-core
//! architecture.
//!
//! Code units of a program graph are classified along two axes by the same
//! fixed-point engine, then checked against a core/shell layout.

pub mod architecture;
pub mod classification;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod graph;
pub mod observability;
pub mod output;

// Re-export commonly used types
pub use crate::architecture::{
    functional_core_architecture, EvaluationResult, FunctionalCoreArchitecture,
};
pub use crate::classification::{
    AnalysisSession, Catalog, Determinism, DeterminismAxis, DeterminismSession, Purity,
    PurityAxis, PuritySession,
};
pub use crate::diagnostics::{Diagnostic, Diagnostics, ReasonCode};
pub use crate::errors::{Error, Result};
pub use crate::graph::{ProgramGraph, TypeDecl, UnitDecl};
