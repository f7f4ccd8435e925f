use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};

/// Configuration for the `access_control` module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessControlConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Enables tenant allowance enforcement and tenant-filtered trees.
    #[serde(default)]
    pub tenant_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `postgres://...` or `sqlite::memory:`.
    #[serde(default = "default_dsn")]
    pub dsn: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Apply pending migrations on connect.
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: default_dsn(),
            max_connections: default_max_connections(),
            auto_migrate: default_auto_migrate(),
        }
    }
}

fn default_dsn() -> String {
    "sqlite::memory:".to_owned()
}

fn default_max_connections() -> u32 {
    5
}

fn default_auto_migrate() -> bool {
    true
}

impl AccessControlConfig {
    /// Load configuration from an optional YAML file, with
    /// `ACCESS_CONTROL__*` environment variables taking precedence.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or a value fails to
    /// deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("ACCESS_CONTROL__").split("__"))
            .extract()
    }
}
