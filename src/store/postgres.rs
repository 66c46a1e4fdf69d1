//! PostgreSQL adapter using sqlx. Creates the target database on first start.

use crate::config::{AppConfig, PostgresConfig};
use crate::error::StorageError;
use crate::model::{NewStudent, Student};
use crate::store::queries::{Queries, POSTGRES};
use crate::store::{Driver, Storage};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;

const QUERIES: &Queries = &POSTGRES;

/// Database every server has; used to run CREATE DATABASE.
const ADMIN_DATABASE: &str = "postgres";

/// SQLSTATE duplicate_database.
const DUPLICATE_DATABASE: &str = "42P04";

#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage").finish_non_exhaustive()
    }
}

impl PostgresStorage {
    /// Ensure the configured database exists, open the pool and ensure the students table.
    pub async fn connect(config: &AppConfig) -> Result<Self, StorageError> {
        let pg = &config.postgres;
        let options = connect_options(pg)?;
        ensure_database_exists(pg).await?;

        let pool = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout())
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.ping().await?;
        sqlx::query(QUERIES.create_table).execute(&storage.pool).await?;
        tracing::info!(host = %pg.host, dbname = %pg.dbname, "postgres connected, students table ensured");
        Ok(storage)
    }
}

/// Connection options for the configured database. Host, user and dbname are required.
pub fn connect_options(pg: &PostgresConfig) -> Result<PgConnectOptions, StorageError> {
    for (name, value) in [
        ("postgres host", &pg.host),
        ("postgres user", &pg.user),
        ("postgres dbname", &pg.dbname),
    ] {
        if value.trim().is_empty() {
            return Err(StorageError::MissingConfig(name));
        }
    }
    let ssl_mode = PgSslMode::from_str(&pg.sslmode)
        .map_err(|_| StorageError::InvalidConfig(format!("invalid sslmode '{}'", pg.sslmode)))?;
    let mut options = PgConnectOptions::new()
        .host(&pg.host)
        .port(pg.port)
        .username(&pg.user)
        .database(&pg.dbname)
        .ssl_mode(ssl_mode);
    if !pg.password.is_empty() {
        options = options.password(&pg.password);
    }
    Ok(options)
}

/// Connects to the `postgres` database and creates `pg.dbname` if it is missing.
/// A concurrent creator winning the race is not an error.
pub async fn ensure_database_exists(pg: &PostgresConfig) -> Result<(), StorageError> {
    if pg.dbname == ADMIN_DATABASE {
        return Ok(());
    }
    let admin = connect_options(pg)?.database(ADMIN_DATABASE);
    let mut conn = admin.connect().await?;

    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&pg.dbname)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        // DDL cannot bind identifiers, so the name is quoted instead.
        let sql = format!("CREATE DATABASE {}", quote_ident(&pg.dbname));
        match sqlx::query(&sql).execute(&mut conn).await {
            Ok(_) => tracing::info!(dbname = %pg.dbname, "created database"),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(DUPLICATE_DATABASE) => {}
            Err(e) => return Err(e.into()),
        }
    }
    conn.close().await?;
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn create_student(&self, student: &NewStudent) -> Result<i64, StorageError> {
        tracing::debug!(sql = %QUERIES.insert, "query");
        let (id,): (i64,) = sqlx::query_as(QUERIES.insert)
            .bind(&student.name)
            .bind(&student.email)
            .bind(student.age)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
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
        Driver::Postgres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg() -> PostgresConfig {
        PostgresConfig {
            host: "localhost".into(),
            user: "app".into(),
            dbname: "students".into(),
            ..Default::default()
        }
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("students"), "\"students\"");
        assert_eq!(quote_ident("a\"; DROP DATABASE x; --"), "\"a\"\"; DROP DATABASE x; --\"");
    }

    #[test]
    fn connect_options_require_host_user_and_dbname() {
        assert!(connect_options(&pg()).is_ok());
        for blank in ["host", "user", "dbname"] {
            let mut cfg = pg();
            match blank {
                "host" => cfg.host.clear(),
                "user" => cfg.user.clear(),
                _ => cfg.dbname.clear(),
            }
            assert!(matches!(connect_options(&cfg), Err(StorageError::MissingConfig(_))));
        }
    }

    #[test]
    fn rejects_unknown_sslmode() {
        let cfg = PostgresConfig { sslmode: "sometimes".into(), ..pg() };
        assert!(matches!(connect_options(&cfg), Err(StorageError::InvalidConfig(_))));
    }

    fn live_config() -> Option<AppConfig> {
        let host = std::env::var("TEST_POSTGRES_HOST").ok()?;
        Some(AppConfig {
            postgres: PostgresConfig {
                host,
                user: std::env::var("TEST_POSTGRES_USER").unwrap_or_else(|_| "postgres".into()),
                password: std::env::var("TEST_POSTGRES_PASSWORD").unwrap_or_default(),
                dbname: "student_api_test".into(),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL server (TEST_POSTGRES_HOST)"]
    async fn round_trip_against_live_server() {
        let Some(config) = live_config() else { return };
        let storage = PostgresStorage::connect(&config).await.unwrap();
        // Idempotent: a second connect finds the database and table in place.
        let storage2 = PostgresStorage::connect(&config).await.unwrap();
        storage2.close().await;

        let email = format!("pg-{}@x.com", std::process::id());
        let input = NewStudent { name: "Ada".into(), email: email.clone(), age: 30 };
        let id = storage.create_student(&input).await.unwrap();
        assert_eq!(storage.get_student_by_id(id).await.unwrap(), input.clone().with_id(id));
        assert!(matches!(
            storage.create_student(&input).await,
            Err(StorageError::ConstraintViolation(_))
        ));
        assert!(matches!(
            storage.update_student_by_id(-1, &input).await,
            Err(StorageError::NotFound(-1))
        ));
        storage.close().await;
    }
}
