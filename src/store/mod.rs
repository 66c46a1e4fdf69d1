//! Storage contract and its SQLite / PostgreSQL adapters.
//!
//! Handlers only see [`Storage`]; the concrete adapter is picked once at startup by
//! [`new_storage`] from the configured driver name.

use crate::error::StorageError;
use crate::model::{NewStudent, Student};
use async_trait::async_trait;

pub mod factory;
pub mod postgres;
pub mod queries;
pub mod sqlite;

pub use factory::{new_storage, Driver, SUPPORTED_DRIVERS};
pub use postgres::PostgresStorage;
pub use sqlite::SqliteStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert one student and return the id assigned by the database.
    async fn create_student(&self, student: &NewStudent) -> Result<i64, StorageError>;

    async fn get_student_by_id(&self, id: i64) -> Result<Student, StorageError>;

    /// All students ordered by id ascending.
    async fn get_students(&self) -> Result<Vec<Student>, StorageError>;

    /// Replace name, email and age of an existing student and return the re-read row.
    async fn update_student_by_id(&self, id: i64, student: &NewStudent) -> Result<Student, StorageError>;

    /// Round trip to the database.
    async fn ping(&self) -> Result<(), StorageError>;

    async fn close(&self);

    fn driver(&self) -> Driver;
}
