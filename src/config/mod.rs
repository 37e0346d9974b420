// Core configuration types
mod core;
mod loader;

pub use self::core::{ArchitectureConfig, CatalogConfig, FuncoreConfig};
pub use loader::{
    default_config_toml, directory_ancestors, load_config, load_config_file, load_config_from,
    parse_config, CONFIG_FILE_NAME,
};
