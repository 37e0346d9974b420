use std::fs;
use std::path::{Path, PathBuf};

use super::core::FuncoreConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".funcore.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

const DEFAULT_CONFIG: &str = r#"# funcore configuration

[architecture]
# Package prefixes of the functional core; every unit here must be side-effect free
core = []
# Package prefixes of the imperative shell; the core must not depend on them
shell = []
# Also require determinism from core units
check_determinism = true

[purity]
# Merge in the built-in runtime-library catalog
use_standard = true
strict = []
domain = []
not = []

[determinism]
use_standard = true
strict = []
domain = []
not = []
"#;

/// Commented template written by `funcore init`
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG
}

/// Parse and validate config from a TOML string
pub fn parse_config(contents: &str) -> Result<FuncoreConfig> {
    let config = toml::from_str::<FuncoreConfig>(contents)
        .map_err(|e| Error::Configuration(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &FuncoreConfig) -> Result<()> {
    let architecture = &config.architecture;
    let catalog_prefixes = config.purity.prefixes().chain(config.determinism.prefixes());
    if architecture
        .core
        .iter()
        .chain(&architecture.shell)
        .chain(catalog_prefixes)
        .any(|prefix| prefix.trim().is_empty())
    {
        return Err(Error::Configuration("empty package prefix".to_string()));
    }

    if let Some(shared) = architecture
        .core
        .iter()
        .find(|prefix| architecture.shell.contains(prefix))
    {
        return Err(Error::Configuration(format!(
            "'{}' is declared as both core and shell",
            shared
        )));
    }

    if architecture.max_rounds == Some(0) {
        return Err(Error::Configuration("max_rounds must be positive".to_string()));
    }
    Ok(())
}

/// Load an explicitly named config file; any failure is an error.
pub fn load_config_file(path: &Path) -> Result<FuncoreConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config = parse_config(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try one discovered candidate; unreadable or invalid files are skipped.
fn try_load_config_from_path(config_path: &Path) -> Option<FuncoreConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{} in {}. Using defaults.", e, config_path.display());
            None
        }
    }
}

/// `start` followed by at most `max_depth - 1` of its ancestors
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.funcore.toml`.
pub fn load_config_from(start: &Path) -> FuncoreConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            FuncoreConfig::default()
        })
}

pub fn load_config() -> FuncoreConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            FuncoreConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config = parse_config(default_config_toml()).unwrap();
        assert_eq!(config, FuncoreConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(indoc! {r#"
            [architecture]
            core = ["hamburg.core."]
            shell = ["hamburg.shell."]
            check_determinism = false
            max_rounds = 64

            [purity]
            use_standard = false
            strict = ["java.util.stream."]
        "#})
        .unwrap();

        assert_eq!(config.architecture.core, vec!["hamburg.core."]);
        assert!(!config.architecture.check_determinism);
        assert_eq!(config.architecture.max_rounds, Some(64));
        assert!(!config.purity.use_standard);
        assert!(config.determinism.use_standard);
    }

    #[test]
    fn test_rejects_core_shell_overlap() {
        let err = parse_config(indoc! {r#"
            [architecture]
            core = ["app."]
            shell = ["app."]
        "#})
        .unwrap_err();
        assert!(err.to_string().contains("both core and shell"));
    }

    #[test]
    fn test_rejects_empty_prefix() {
        assert!(parse_config("[purity]\nnot = [\"\"]\n").is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            parse_config("[architecture\ncore = 1"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_directory_ancestors_is_bounded() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }
}
