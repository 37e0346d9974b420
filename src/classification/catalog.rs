//! Preclassification catalog.
//!
//! Prefix-matched trusted classifications for units whose bodies are not
//! inspected, typically runtime-library calls. Priority on overlapping
//! prefixes is strict, then domain, then not.

use super::lattice::Grade;
use crate::config::CatalogConfig;
use std::collections::BTreeSet;

const PURITY_STRICT: &[&str] = &[
    "java.lang.Object.clone()",
    "java.lang.Object.hashCode()",
    "java.lang.Object.toString()",
    "java.lang.Object.getClass()",
    "java.lang.Class.getSimpleName()",
    "java.lang.Class.privateGetPublicMethods()",
    "java.lang.Class.getGenericInfo()",
];

const PURITY_DOMAIN: &[&str] = &["java.util.logging.", "java.util.function.BiConsumer"];

/// Runtime areas touching I/O, reflection, concurrency or process state
const RUNTIME_IMPURE: &[&str] = &[
    "java.io.",
    "java.nio.",
    "java.reflect.",
    "jdk.internal.",
    "sun.management.",
    "sun.reflect.",
    "java.net.",
    "java.security.",
    "javax.xml",
    "sun.invoke.",
    "javax.management.",
    "org.w3c.",
    "java.util.concurrent.",
    "java.util.logging.",
    "java.lang.invoke.",
];

const NON_DETERMINISTIC: &[&str] = &[
    "java.util.stream",
    "java.lang.Runnable",
    "java.util.Random",
    "java.lang.Math.random(",
    "java.lang.System.currentTimeMillis(",
    "java.lang.System.nanoTime(",
    "java.time.LocalDate.now(",
    "java.time.LocalTime.now(",
    "java.time.LocalDateTime.now(",
    "java.time.Instant.now(",
    "java.util.UUID.randomUUID(",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    strict: BTreeSet<String>,
    domain: BTreeSet<String>,
    not: BTreeSet<String>,
}

impl Catalog {
    /// Catalog classifying nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard_purity() -> Self {
        Self::empty()
            .with_strict(PURITY_STRICT.iter().copied())
            .with_domain(PURITY_DOMAIN.iter().copied())
            .with_not(RUNTIME_IMPURE.iter().copied())
    }

    pub fn standard_determinism() -> Self {
        Self::empty()
            .with_not(RUNTIME_IMPURE.iter().copied())
            .with_not(NON_DETERMINISTIC.iter().copied())
    }

    /// Merge user prefixes onto `standard` when the configuration asks for it.
    pub fn from_config(config: &CatalogConfig, standard: Catalog) -> Self {
        let base = if config.use_standard {
            standard
        } else {
            Self::empty()
        };
        base.with_strict(config.strict.iter().cloned())
            .with_domain(config.domain.iter().cloned())
            .with_not(config.not.iter().cloned())
    }

    pub fn with_strict<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strict.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn with_domain<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn with_not<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not.extend(prefixes.into_iter().map(Into::into));
        self
    }

    pub fn lookup(&self, qualified_name: &str) -> Option<Grade> {
        if matches_any(&self.strict, qualified_name) {
            Some(Grade::Strict)
        } else if matches_any(&self.domain, qualified_name) {
            Some(Grade::Domain)
        } else if matches_any(&self.not, qualified_name) {
            Some(Grade::Not)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strict.is_empty() && self.domain.is_empty() && self.not.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strict.len() + self.domain.len() + self.not.len()
    }
}

fn matches_any(prefixes: &BTreeSet<String>, name: &str) -> bool {
    prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
}
