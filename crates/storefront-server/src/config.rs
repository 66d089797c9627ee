use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use storefront_store::DEFAULT_LIMIT;

use crate::error::{ServerError, ServerResult};

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DATABASE_NAME: &str = "DATABASE_NAME";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SEED_DB: &str = "SEED_DB";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
    pub default_limit: usize,
    pub seed_on_start: bool,
    /// Which database variables came from the environment. Never carries
    /// their values.
    #[serde(skip)]
    pub env: EnvPresence,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            database: DatabaseConfig::default(),
            default_limit: DEFAULT_LIMIT,
            seed_on_start: false,
            env: EnvPresence::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "memory://".into(),
            name: "storefront".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvPresence {
    pub database_url: bool,
    pub database_name: bool,
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read the optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    ServerError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override settings from `lookup` (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = set(ENV_DATABASE_URL) {
            self.database.url = url;
            self.env.database_url = true;
        }
        if let Some(name) = set(ENV_DATABASE_NAME) {
            self.database.name = name;
            self.env.database_name = true;
        }
        if let Some(port) = set(ENV_PORT) {
            let port = port
                .parse::<u16>()
                .map_err(|e| ServerError::Config(format!("invalid {ENV_PORT} {port:?}: {e}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(seed) = set(ENV_SEED_DB) {
            self.seed_on_start = seed.parse::<bool>().map_err(|e| {
                ServerError::Config(format!("invalid {ENV_SEED_DB} {seed:?}: {e}"))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.database.url, "memory://");
        assert_eq!(c.database.name, "storefront");
        assert_eq!(c.default_limit, 50);
        assert!(!c.seed_on_start);
        assert_eq!(c.env, EnvPresence::default());
    }

    #[test]
    fn toml_overrides_defaults_partially() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "127.0.0.1:9000"

            [database]
            url = "file:///var/lib/storefront"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.database.url, "file:///var/lib/storefront");
        assert_eq!(c.database.name, "storefront");
        assert_eq!(c.default_limit, 50);
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(
            ServerConfig::from_toml_str("bind_addr = 12"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn env_overrides_and_records_presence() {
        let mut c = ServerConfig::default();
        c.apply_env(env(&[
            ("DATABASE_URL", "file:///tmp/db"),
            ("DATABASE_NAME", "shop"),
            ("PORT", "8081"),
            ("SEED_DB", "true"),
        ]))
        .unwrap();
        assert_eq!(c.database.url, "file:///tmp/db");
        assert_eq!(c.database.name, "shop");
        assert_eq!(c.bind_addr.port(), 8081);
        assert!(c.seed_on_start);
        assert!(c.env.database_url);
        assert!(c.env.database_name);
    }

    #[test]
    fn empty_env_values_count_as_unset() {
        let mut c = ServerConfig::default();
        c.apply_env(env(&[("DATABASE_URL", "")])).unwrap();
        assert_eq!(c.database.url, "memory://");
        assert!(!c.env.database_url);
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut c = ServerConfig::default();
        assert!(c.apply_env(env(&[("PORT", "http")])).is_err());
    }
}
