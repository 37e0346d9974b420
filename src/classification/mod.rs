//! Generic classification engine.
//!
//! Purity and determinism are the same dataflow problem over the same
//! five-valued lattice. [`AnalysisSession`] implements it once and each
//! [`Axis`] supplies the parts that differ.

pub mod axis;
pub mod catalog;
pub mod dispatch;
pub mod lattice;
pub mod propagation;
pub mod session;

pub use axis::{Axis, DeterminismAxis, Finding, LocalOutcome, PurityAxis};
pub use catalog::Catalog;
pub use lattice::{Determinism, Grade, Lattice, Purity};
pub use session::{
    AnalysisSession, ClassificationCounts, DeterminismSession, PuritySession, RunSummary,
};
