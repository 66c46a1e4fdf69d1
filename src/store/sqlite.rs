//! SQLite adapter using sqlx.

use crate::config::AppConfig;
use crate::error::StorageError;
use crate::model::{NewStudent, Student};
use crate::store::queries::{Queries, SQLITE};
use crate::store::{Driver, Storage};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;

const QUERIES: &Queries = &SQLITE;

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage").finish_non_exhaustive()
    }
}

impl SqliteStorage {
    /// Open (or create) the database file at `storage_path` and ensure the students table.
    pub async fn connect(config: &AppConfig) -> Result<Self, StorageError> {
        let path = config
            .storage_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(StorageError::MissingConfig("storage path"))?;

        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::InvalidConfig(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout())
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.ping().await?;
        sqlx::query(QUERIES.create_table).execute(&storage.pool).await?;
        tracing::info!(path = %path, "sqlite connected, students table ensured");
        Ok(storage)
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_student(&self, student: &NewStudent) -> Result<i64, StorageError> {
        tracing::debug!(sql = %QUERIES.insert, "query");
        let result = sqlx::query(QUERIES.insert)
            .bind(&student.name)
            .bind(&student.email)
            .bind(student.age)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Student, StorageError> {
        tracing::debug!(sql = %QUERIES.select_by_id, id, "query");
        sqlx::query_as::<_, Student>(QUERIES.select_by_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound(id))
    }

    async fn get_students(&self) -> Result<Vec<Student>, StorageError> {
        tracing::debug!(sql = %QUERIES.select_all, "query");
        let rows = sqlx::query_as::<_, Student>(QUERIES.select_all)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_student_by_id(&self, id: i64, student: &NewStudent) -> Result<Student, StorageError> {
        tracing::debug!(sql = %QUERIES.update, id, "query");
        let result = sqlx::query(QUERIES.update)
            .bind(&student.name)
            .bind(&student.email)
            .bind(student.age)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        self.get_student_by_id(id).await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query(QUERIES.ping).execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn driver(&self) -> Driver {
        Driver::Sqlite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open() -> (SqliteStorage, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            storage_path: Some(dir.path().join("data/students.db").display().to_string()),
            ..Default::default()
        };
        let storage = SqliteStorage::connect(&config).await.unwrap();
        (storage, dir)
    }

    fn student(name: &str, email: &str, age: i32) -> NewStudent {
        NewStudent { name: name.into(), email: email.into(), age }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let (storage, _dir) = open().await;
        let input = student("Ada", "ada@x.com", 30);
        let id = storage.create_student(&input).await.unwrap();
        assert!(id > 0);
        assert_eq!(storage.get_student_by_id(id).await.unwrap(), input.with_id(id));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation() {
        let (storage, _dir) = open().await;
        let first = student("Ada", "ada@x.com", 30);
        let id = storage.create_student(&first).await.unwrap();

        let err = storage
            .create_student(&student("Other", "ada@x.com", 40))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)), "{err:?}");
        assert_eq!(storage.get_student_by_id(id).await.unwrap(), first.with_id(id));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (storage, _dir) = open().await;
        assert!(matches!(
            storage.get_student_by_id(42).await,
            Err(StorageError::NotFound(42))
        ));
        assert!(matches!(
            storage.update_student_by_id(42, &student("A", "a@x.com", 5)).await,
            Err(StorageError::NotFound(42))
        ));
        assert!(storage.get_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let (storage, _dir) = open().await;
        let id = storage.create_student(&student("Ada", "ada@x.com", 30)).await.unwrap();
        let changed = student("Ada L", "lovelace@x.com", 31);

        let updated = storage.update_student_by_id(id, &changed).await.unwrap();
        assert_eq!(updated, changed.clone().with_id(id));
        assert_eq!(storage.get_student_by_id(id).await.unwrap(), changed.with_id(id));
    }

    #[tokio::test]
    async fn update_to_taken_email_is_rejected() {
        let (storage, _dir) = open().await;
        storage.create_student(&student("Ada", "ada@x.com", 30)).await.unwrap();
        let id = storage.create_student(&student("Bob", "bob@x.com", 20)).await.unwrap();

        let err = storage
            .update_student_by_id(id, &student("Bob", "ada@x.com", 20))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
        assert_eq!(storage.get_student_by_id(id).await.unwrap().email, "bob@x.com");
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let (storage, _dir) = open().await;
        let mut ids = Vec::new();
        for (i, name) in ["c", "a", "b"].iter().enumerate() {
            let email = format!("{name}@x.com");
            ids.push(storage.create_student(&student(name, &email, 20 + i as i32)).await.unwrap());
        }
        storage
            .update_student_by_id(ids[0], &student("z", "z@x.com", 99))
            .await
            .unwrap();

        let listed: Vec<i64> = storage.get_students().await.unwrap().iter().map(|s| s.id).collect();
        let mut sorted = listed.clone();
        sorted.sort_unstable();
        assert_eq!(listed, sorted);
        assert_eq!(listed.len(), 3);
    }

    #[tokio::test]
    async fn missing_storage_path_is_rejected() {
        let err = SqliteStorage::connect(&AppConfig::default()).await.unwrap_err();
        assert!(matches!(err, StorageError::MissingConfig(_)));
    }
}
