//! Load config from a YAML file, then apply environment overrides.

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

impl AppConfig {
    /// Read `path`, apply process environment overrides and validate.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.ok_or(ConfigError::MissingPath)?;
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Environment values win over the file. `lookup` returns the raw value for a key.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &'static str, slot: &mut String| {
            if let Some(v) = lookup(key) {
                *slot = v;
            }
        };
        text("ENV", &mut self.env);
        text("DB_DRIVER", &mut self.db_driver);
        text("HTTP_ADDRESS", &mut self.http_server.address);
        text("POSTGRES_HOST", &mut self.postgres.host);
        text("POSTGRES_USER", &mut self.postgres.user);
        text("POSTGRES_PASSWORD", &mut self.postgres.password);
        text("POSTGRES_DB", &mut self.postgres.dbname);
        text("POSTGRES_SSLMODE", &mut self.postgres.sslmode);
        if let Some(v) = lookup("STORAGE_PATH") {
            self.storage_path = Some(v);
        }

        if let Some(port) = parsed(&lookup, "POSTGRES_PORT")? {
            self.postgres.port = port;
        }
        if let Some(secs) = parsed(&lookup, "HTTP_SHUTDOWN_GRACE_SECS")? {
            self.http_server.shutdown_grace_secs = secs;
        }
        if let Some(n) = parsed(&lookup, "DB_MAX_CONNECTIONS")? {
            self.pool.max_connections = n;
        }
        if let Some(secs) = parsed(&lookup, "DB_ACQUIRE_TIMEOUT_SECS")? {
            self.pool.acquire_timeout_secs = secs;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("env", &self.env),
            ("http_server.address", &self.http_server.address),
            ("db_driver", &self.db_driver),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{} is required", name)));
            }
        }
        if self.pool.max_connections == 0 {
            return Err(ConfigError::Validation(
                "pool.max_connections must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn parsed<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
env: "dev"
db_driver: "sqlite"
storage_path: "storage/students.db"
http_server:
  address: "127.0.0.1:8082"
postgres:
  host: "db"
  user: "app"
  dbname: "students"
"#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn parses_file_with_defaults() {
        let config = AppConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.env, "dev");
        assert_eq!(config.storage_path.as_deref(), Some("storage/students.db"));
        assert_eq!(config.http_server.shutdown_grace_secs, 5);
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.postgres.sslmode, "disable");
        assert_eq!(config.pool.max_connections, 5);
        config.validate().unwrap();
    }

    #[test]
    fn environment_wins_over_file() {
        let mut config = AppConfig::from_yaml(SAMPLE).unwrap();
        config
            .apply_overrides(env(&[
                ("HTTP_ADDRESS", "0.0.0.0:9000"),
                ("DB_DRIVER", "postgres"),
                ("POSTGRES_PORT", "6543"),
                ("DB_MAX_CONNECTIONS", "12"),
            ]))
            .unwrap();
        assert_eq!(config.http_server.address, "0.0.0.0:9000");
        assert_eq!(config.db_driver, "postgres");
        assert_eq!(config.postgres.port, 6543);
        assert_eq!(config.pool.max_connections, 12);
        assert_eq!(config.postgres.host, "db");
    }

    #[test]
    fn unparsable_override_is_an_error() {
        let mut config = AppConfig::from_yaml(SAMPLE).unwrap();
        let err = config
            .apply_overrides(env(&[("POSTGRES_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "POSTGRES_PORT", .. }));
    }

    #[test]
    fn missing_required_fields_fail_validation() {
        let config = AppConfig::from_yaml("db_driver: sqlite\n").unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "validation: env is required");
    }

    #[test]
    fn missing_path_and_missing_file() {
        assert!(matches!(AppConfig::load(None), Err(ConfigError::MissingPath)));
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            AppConfig::from_file(&missing),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.db_driver, "sqlite");
    }
}
