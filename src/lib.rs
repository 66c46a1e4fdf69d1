//! Student API: REST CRUD for student records on SQLite or PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, StorageError};
pub use model::{NewStudent, Student, StudentPayload};
pub use routes::{common_routes, student_routes};
pub use server::{build_router, serve, shutdown_signal, Shutdown};
pub use state::AppState;
pub use store::{new_storage, Driver, PostgresStorage, SqliteStorage, Storage};
