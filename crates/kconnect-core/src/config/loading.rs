//! Configuration loading and merging logic.
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults**
//! 2. **User config** - `~/.kconnect/config.toml`, or the file named by `KCONNECT_CONFIG`
//! 3. **Project config** - `./.kconnect/config.toml`
//! 4. **CLI arguments** - command-line flags and `KCONNECT_*` variables (highest priority)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::types::{DefaultsConfig, KconnectConfig};
use crate::errors::ConfigError;

/// Environment variable naming the user config file.
pub const CONFIG_ENV: &str = "KCONNECT_CONFIG";

const CONFIG_DIR: &str = ".kconnect";
const CONFIG_FILE: &str = "config.toml";

/// Load and merge the user and project config files.
///
/// Missing files are not errors; unreadable or malformed ones are.
pub fn load_hierarchy() -> Result<KconnectConfig, ConfigError> {
    let mut config = KconnectConfig::default();

    match user_config_path() {
        Some(path) => {
            if let Some(user) = load_config_file(&path)? {
                config = merge_configs(config, user);
            }
        }
        None => warn!(
            event = "core.config.home_dir_not_found",
            "Could not determine home directory - skipping user config"
        ),
    }

    let project_path = std::env::current_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    if let Some(project) = load_config_file(&project_path)? {
        config = merge_configs(config, project);
    }

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load one config file. Returns `None` when the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<KconnectConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(event = "core.config.not_found", path = %path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let mut config: KconnectConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    config.defaults.kubeconfig = config.defaults.kubeconfig.map(|p| expand_home(&p));

    debug!(event = "core.config.loaded", path = %path.display());
    Ok(Some(config))
}

/// Merge two configurations, with `override_config` taking precedence.
///
/// Provider sections merge option by option.
pub fn merge_configs(base: KconnectConfig, override_config: KconnectConfig) -> KconnectConfig {
    let mut providers = base.providers;
    for (name, options) in override_config.providers {
        providers.entry(name).or_default().extend(options);
    }

    KconnectConfig {
        defaults: DefaultsConfig {
            idp_protocol: override_config
                .defaults
                .idp_protocol
                .or(base.defaults.idp_protocol),
            set_current: override_config
                .defaults
                .set_current
                .or(base.defaults.set_current),
            kubeconfig: override_config
                .defaults
                .kubeconfig
                .or(base.defaults.kubeconfig),
        },
        providers,
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
