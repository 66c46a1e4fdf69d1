//! Maps the configured driver name to a storage adapter.

use crate::config::AppConfig;
use crate::error::StorageError;
use crate::store::{PostgresStorage, SqliteStorage, Storage};
use std::sync::Arc;

pub const SUPPORTED_DRIVERS: &[&str] = &["sqlite", "postgres"];

/// Storage backend selected by `db_driver`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Driver {
    Sqlite,
    Postgres,
}

impl Driver {
    pub fn as_str(self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite",
            Driver::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Driver {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Driver::Sqlite),
            "postgres" => Ok(Driver::Postgres),
            _ => Err(StorageError::UnsupportedDriver {
                driver: s.to_string(),
                supported: SUPPORTED_DRIVERS,
            }),
        }
    }
}

/// Build the storage adapter named by `config.db_driver`. No retry, no fallback.
pub async fn new_storage(config: &AppConfig) -> Result<Arc<dyn Storage>, StorageError> {
    let driver: Driver = config.db_driver.parse()?;
    tracing::info!(driver = %driver, "initializing storage");
    let storage: Arc<dyn Storage> = match driver {
        Driver::Sqlite => Arc::new(SqliteStorage::connect(config).await?),
        Driver::Postgres => Arc::new(PostgresStorage::connect(config).await?),
    };
    Ok(storage)
}
