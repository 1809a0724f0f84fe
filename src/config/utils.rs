use super::schemas::Config;
/// Configuration utilities - loading and overrides
///
/// The loaded `Config` is owned by `AppState`; handlers read it from there.
use std::path::Path;
use thiserror::Error;

use crate::arguments::Arguments;
use crate::logger::{self, LogTag};

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },
}

/// Read a config file, falling back to defaults when it does not exist
pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path.display()),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str::<Config>(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Apply `HOST`, `PORT` and `DATABASE_PATH` from a variable lookup
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
        config.webserver.host = host.trim().to_string();
    }

    if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
        config.webserver.port =
            port.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidOverride {
                    key: "PORT".to_string(),
                    value: port.clone(),
                })?;
    }

    if let Some(path) = lookup("DATABASE_PATH").filter(|p| !p.trim().is_empty()) {
        config.database.path = path.trim().to_string();
    }

    Ok(())
}

/// Apply `--host` / `--port`; these win over file and environment
pub fn apply_cli_overrides(config: &mut Config, args: &Arguments) {
    if let Some(host) = &args.host {
        config.webserver.host = host.clone();
    }
    if let Some(port) = args.port {
        config.webserver.port = port;
    }
}

/// Load configuration (file → env → CLI)
pub fn load_config(args: &Arguments) -> Result<Config, ConfigError> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| crate::paths::resolve(CONFIG_FILE_PATH));

    let mut config = read_config_file(&path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    apply_cli_overrides(&mut config, args);

    logger::debug(
        LogTag::Config,
        &format!("Configuration loaded from {}", path.display()),
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = read_config_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.webserver.port, 3300);
        assert_eq!(config.readings.list_default_limit, 500);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[webserver]\nport = 8088\n\n[websocket]\nbuffer_size = 8").unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.webserver.port, 8088);
        assert_eq!(config.webserver.host, "0.0.0.0");
        assert_eq!(config.websocket.buffer_size, 8);
        assert_eq!(config.websocket.heartbeat_secs, 30);
    }

    #[test]
    fn test_bad_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[webserver\nport = ").unwrap();

        assert!(matches!(
            read_config_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [("PORT", "4100"), ("DATABASE_PATH", "/tmp/x.db")]
            .into_iter()
            .collect();
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.webserver.port, 4100);
        assert_eq!(config.database.path, "/tmp/x.db");
        assert_eq!(config.webserver.host, "0.0.0.0");
    }

    #[test]
    fn test_env_override_rejects_bad_port() {
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, |k| {
            (k == "PORT").then(|| "eighty".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidOverride { .. })));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = Config::default();
        let args = Arguments {
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
            ..Arguments::default()
        };
        apply_cli_overrides(&mut config, &args);
        assert_eq!(config.webserver.host, "127.0.0.1");
        assert_eq!(config.webserver.port, 9000);
    }
}
