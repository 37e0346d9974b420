use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Root configuration structure for funcore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FuncoreConfig {
    /// Module layout of the functional core and imperative shell
    #[serde(default)]
    pub architecture: ArchitectureConfig,

    /// Preclassified prefixes for the purity axis
    #[serde(default)]
    pub purity: CatalogConfig,

    /// Preclassified prefixes for the determinism axis
    #[serde(default)]
    pub determinism: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    /// Package prefixes forming the functional core
    #[serde(default)]
    pub core: Vec<String>,

    /// Package prefixes forming the imperative shell
    #[serde(default)]
    pub shell: Vec<String>,

    /// Owners to report on; defaults to the core prefixes
    #[serde(default)]
    pub report_scope: Option<Vec<String>>,

    #[serde(default = "default_true")]
    pub check_determinism: bool,

    /// Round bound for the fixed point; derived from the program size when unset
    #[serde(default)]
    pub max_rounds: Option<usize>,
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self {
            core: Vec::new(),
            shell: Vec::new(),
            report_scope: None,
            check_determinism: true,
            max_rounds: None,
        }
    }
}

/// User additions to one axis' preclassification catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Merge in the built-in runtime-library catalog
    #[serde(default = "default_true")]
    pub use_standard: bool,

    #[serde(default)]
    pub strict: Vec<String>,

    #[serde(default)]
    pub domain: Vec<String>,

    #[serde(default)]
    pub not: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            use_standard: true,
            strict: Vec::new(),
            domain: Vec::new(),
            not: Vec::new(),
        }
    }
}

impl CatalogConfig {
    pub(crate) fn prefixes(&self) -> impl Iterator<Item = &String> {
        self.strict.iter().chain(&self.domain).chain(&self.not)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: FuncoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, FuncoreConfig::default());
        assert!(config.architecture.check_determinism);
        assert!(config.purity.use_standard);
    }
}
