use crate::conf::error::ConfigError;
use crate::conf::types::EcConfig;
use crate::conf::validation::validate_config;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "ec.hcl";

/// `~/.ec/ec.hcl`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ec").join(DEFAULT_CONFIG_FILE))
}

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, `~/.ec/ec.hcl` is used when
/// present and built-in defaults otherwise. The result is not validated yet,
/// so callers can apply command-line overrides first; see [`EcConfig::validated`].
pub fn load_config(path: Option<&Path>) -> Result<EcConfig, ConfigError> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };

    let mut cfg = match path {
        Some(path) => {
            let src = fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;
            let cfg = parse_config(&path, &src)?;
            tracing::debug!(path = %path.display(), "config loaded");
            cfg
        }
        None => {
            tracing::debug!("no config file found, using defaults");
            EcConfig::default()
        }
    };

    cfg.log.dir = expand_home(&cfg.log.dir);
    cfg.server.pid_file = cfg.server.pid_file.as_deref().map(expand_home);

    Ok(cfg)
}

pub fn parse_config(path: &Path, src: &str) -> Result<EcConfig, ConfigError> {
    hcl::from_str(src).map_err(|e| ConfigError::parse(path, e))
}

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without one, or when no home directory is known, are returned as is.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

impl EcConfig {
    /// Validate, returning the config unchanged when it has no errors.
    ///
    /// Warnings are logged and do not fail validation.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let report = validate_config(&self);

        for warning in &report.warnings {
            tracing::warn!(section = %warning.section, "{}", warning.message);
        }

        if report.has_errors() {
            return Err(ConfigError::Validation { report });
        }
        Ok(self)
    }
}
