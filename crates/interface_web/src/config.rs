//! Web front-end configuration
//!
//! Everything is read from the environment once at startup. Server settings
//! use the `SERVER_` prefix and CRM settings the `CRM_` prefix:
//!
//! | Variable                     | Default                  |
//! |------------------------------|--------------------------|
//! | `SERVER_HOST`                | `0.0.0.0`                |
//! | `SERVER_PORT`                | `3000`                   |
//! | `SERVER_LOG_LEVEL`           | `info`                   |
//! | `SERVER_STATIC_DIR`          | `public`                 |
//! | `CRM_BASE_URL`               | `https://api.hubapi.com` |
//! | `CRM_ACCESS_TOKEN`           | required                 |
//! | `CRM_OBJECT_TYPE`            | required                 |
//! | `CRM_SEARCH_FAILURE_POLICY`  | `treat_as_not_found`     |

use std::collections::HashMap;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use domain_pet::CrmConfig;

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory of static assets served at the site root
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_static_dir() -> String {
    "public".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `SERVER_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("SERVER"))
    }

    fn from_environment(source: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub crm: CrmConfig,
}

impl AppConfig {
    /// Loads server and CRM configuration from the environment
    ///
    /// The CRM section is only parsed here; `HubSpotClient::new` validates it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            crm: crm_from_environment(Environment::with_prefix("CRM"))?,
        })
    }

    /// Loads configuration from explicit variable maps instead of the
    /// process environment
    pub fn from_vars(
        server: HashMap<String, String>,
        crm: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_environment(
                Environment::with_prefix("SERVER").source(Some(server)),
            )?,
            crm: crm_from_environment(Environment::with_prefix("CRM").source(Some(crm)))?,
        })
    }
}

fn crm_from_environment(source: Environment) -> Result<CrmConfig, ConfigError> {
    Config::builder()
        .add_source(source)
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pet::SearchFailurePolicy;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_vars(HashMap::new(), HashMap::new()).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.server.static_dir, "public");
        assert_eq!(config.crm.base_url, "https://api.hubapi.com");
        assert!(config.crm.access_token.is_empty());
        assert_eq!(config.crm.search_failure_policy, SearchFailurePolicy::TreatAsNotFound);
    }

    #[test]
    fn test_reads_prefixed_variables() {
        let config = AppConfig::from_vars(
            vars(&[("SERVER_PORT", "8081"), ("SERVER_LOG_LEVEL", "debug")]),
            vars(&[
                ("CRM_ACCESS_TOKEN", "pat-na1-abc"),
                ("CRM_OBJECT_TYPE", "2-42115507"),
                ("CRM_SEARCH_FAILURE_POLICY", "propagate"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.crm.access_token, "pat-na1-abc");
        assert_eq!(config.crm.object_type, "2-42115507");
        assert_eq!(config.crm.search_failure_policy, SearchFailurePolicy::Propagate);
        assert!(config.crm.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        let result = AppConfig::from_vars(vars(&[("SERVER_PORT", "http")]), HashMap::new());
        assert!(result.is_err());
    }
}
