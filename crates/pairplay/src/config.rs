//! Server configuration loaded from the environment.
//!
//! Every setting is optional. Variables are read with the `PAIRPLAY_`
//! prefix, after an optional `.env` file in the working directory has
//! been merged into the process environment:
//!
//! | Variable                   | Default   |
//! |----------------------------|-----------|
//! | `PAIRPLAY_HOST`            | `0.0.0.0` |
//! | `PAIRPLAY_PORT`            | `3001`    |
//! | `PAIRPLAY_ALLOWED_ORIGINS` | *(any)*   |
//! | `PAIRPLAY_CODE_LENGTH`     | `4`       |

use pairplay_room::RoomConfig;
use pairplay_transport::OriginPolicy;
use serde::Deserialize;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "PAIRPLAY_";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid environment: {0}")]
    Env(#[from] envy::Error),

    /// The values parsed but make no sense together.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for a relay server process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[serde(default = "defaults::host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Accepted `Origin` header values. Empty accepts any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Characters per generated room code.
    #[serde(default = "defaults::code_length")]
    pub code_length: usize,
}

impl ServerConfig {
    /// Loads `.env` (if present) and then reads `PAIRPLAY_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "failed to load .env file");
            }
        }
        Self::from_vars(std::env::vars())
    }

    /// Reads configuration from an explicit set of variables.
    ///
    /// Only names carrying [`ENV_PREFIX`] are considered.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// `host:port`, ready for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The cross-origin policy these settings describe.
    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::from_origins(self.allowed_origins.iter().map(String::as_str))
    }

    /// Registry settings.
    pub fn room_config(&self) -> RoomConfig {
        RoomConfig {
            code_length: self.code_length,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.code_length == 0 {
            return Err(ConfigError::Invalid(
                "code length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            allowed_origins: Vec::new(),
            code_length: defaults::code_length(),
        }
    }
}

mod defaults {
    pub fn host() -> String {
        "0.0.0.0".to_string()
    }

    pub fn port() -> u16 {
        3001
    }

    pub fn code_length() -> usize {
        pairplay_room::RoomConfig::default().code_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars_empty_uses_defaults() {
        let config = ServerConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
        assert_eq!(config.origin_policy(), OriginPolicy::Any);
        assert_eq!(config.room_config(), RoomConfig::default());
    }

    #[test]
    fn test_from_vars_reads_prefixed_values() {
        let config = ServerConfig::from_vars(vars(&[
            ("PAIRPLAY_HOST", "127.0.0.1"),
            ("PAIRPLAY_PORT", "9000"),
            ("PAIRPLAY_CODE_LENGTH", "6"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.room_config().code_length, 6);
    }

    #[test]
    fn test_from_vars_ignores_unprefixed_names() {
        let config =
            ServerConfig::from_vars(vars(&[("PORT", "1"), ("HOST", "example")]))
                .unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_from_vars_splits_allowed_origins() {
        let config = ServerConfig::from_vars(vars(&[(
            "PAIRPLAY_ALLOWED_ORIGINS",
            "https://play.example,http://localhost:5173",
        )]))
        .unwrap();

        let policy = config.origin_policy();
        assert!(policy.allows(Some("https://play.example")));
        assert!(policy.allows(Some("http://localhost:5173")));
        assert!(!policy.allows(Some("https://other.example")));
        assert!(!policy.allows(None));
    }

    #[test]
    fn test_from_vars_bad_port_is_env_error() {
        let err =
            ServerConfig::from_vars(vars(&[("PAIRPLAY_PORT", "not-a-port")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn test_from_vars_zero_code_length_is_invalid() {
        let err =
            ServerConfig::from_vars(vars(&[("PAIRPLAY_CODE_LENGTH", "0")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
