//! Server configuration: defaults, optional TOML file, environment overrides.

use anyhow::Context;
use serde::Deserialize;

/// Environment variable overriding the listen address.
pub const ENV_LISTEN: &str = "CAPRELAY_LISTEN";

/// Default listen address.
const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

/// Settings for the server binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP transport binds, e.g. `127.0.0.1:8000`.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Resolve the configuration: defaults, then the TOML file if given,
    /// then environment overrides.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)
                    .with_context(|| format!("read config file {p}"))?;
                toml::from_str(&text).with_context(|| format!("parse config file {p}"))?
            }
            None => Self::default(),
        };

        if let Ok(listen) = std::env::var(ENV_LISTEN) {
            if !listen.is_empty() {
                config.listen = listen;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Single test so the ENV_LISTEN mutations cannot race each other.
    #[test]
    fn resolves_defaults_then_file_then_env() {
        std::env::remove_var(ENV_LISTEN);
        let config = ServerConfig::load(None).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8000");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen = \"0.0.0.0:9000\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.listen, "0.0.0.0:9000");

        std::env::set_var(ENV_LISTEN, "127.0.0.1:9100");
        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.listen, "127.0.0.1:9100");
        std::env::remove_var(ENV_LISTEN);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ServerConfig::load(Some("/nonexistent/caprelay.toml")).is_err());
    }
}
