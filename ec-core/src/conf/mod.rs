mod error;
mod loader;
pub mod types;
pub mod validation;

pub use error::ConfigError;
pub use loader::{DEFAULT_CONFIG_FILE, default_config_path, expand_home, load_config, parse_config};
pub use types::{BuiltinPluginKind, DecodeMode, EcConfig, LogConfig, ServerConfig, StreamConfig};
pub use validation::{ValidationReport, validate_config};
