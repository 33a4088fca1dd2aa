//! Client configuration loaded with figment.
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. `~/.bpconsole/config.yaml`
//! 3. `./bpconsole.yaml`, or the file passed explicitly
//! 4. `BPCONSOLE_*` environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const ENV_PREFIX: &str = "BPCONSOLE_";

const CONFIG_DIR: &str = ".bpconsole";
const USER_CONFIG_FILE: &str = "config.yaml";
const PROJECT_CONFIG_FILE: &str = "bpconsole.yaml";

/// Connection settings for the BindPlane API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load from the standard locations, with `explicit` replacing the
    /// project file when given.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let home = dirs::home_dir();
        let cwd = std::env::current_dir().ok();
        Self::load_from(home.as_deref(), cwd.as_deref(), explicit)
    }

    /// Load with explicit home and working directories.
    pub fn load_from(
        home: Option<&Path>,
        cwd: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let config: ClientConfig = Self::figment(home, cwd, explicit)?.extract()?;
        config.validate()?;
        debug!(
            endpoint = %config.endpoint,
            api_key = config.api_key.is_some(),
            basic_auth = config.username.is_some(),
            timeout_secs = config.timeout_secs,
            "loaded client configuration"
        );
        Ok(config)
    }

    /// The layered figment, before extraction.
    pub fn figment(
        home: Option<&Path>,
        cwd: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(ClientConfig::default()));

        if let Some(home) = home {
            let user_file = home.join(CONFIG_DIR).join(USER_CONFIG_FILE);
            trace!(path = %user_file.display(), "user config");
            figment = figment.merge(Yaml::file(user_file));
        }

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.to_path_buf(),
                    });
                }
                figment = figment.merge(file_provider(path));
            }
            None => {
                if let Some(cwd) = cwd {
                    let project_file: PathBuf = cwd.join(PROJECT_CONFIG_FILE);
                    trace!(path = %project_file.display(), "project config");
                    figment = figment.merge(Yaml::file(project_file));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidValue {
            key: "endpoint".to_string(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "endpoint".to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.password.is_some() && self.username.is_none() {
            return Err(ConfigError::InvalidValue {
                key: "password".to_string(),
                message: "password requires a username".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The endpoint without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

fn file_provider(path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Figment::from(Toml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        _ => Figment::from(Yaml::file(path)),
    }
}
