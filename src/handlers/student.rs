//! Student handlers: create, read, list, update.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{Student, StudentPayload};
use crate::response::{self, StudentWritten};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id {}", id_str)))
}

/// POST /api/student
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<StudentPayload>,
) -> Result<(StatusCode, Json<StudentWritten>), AppError> {
    let student = body.validate()?;
    let id = state
        .storage
        .create_student(&student)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, email = %student.email, "creating student failed");
            AppError::Rejected(e)
        })?;
    tracing::info!(name = %student.name, email = %student.email, id, "created student record");
    Ok(response::created(student.with_id(id)))
}

/// GET /api/student/:id
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Student>, AppError> {
    tracing::info!(id = %id_str, "getting student record");
    let id = parse_id(&id_str)?;
    let student = state.storage.get_student_by_id(id).await.map_err(|e| {
        tracing::error!(error = %e, id, "getting student failed");
        e
    })?;
    Ok(Json(student))
}

/// GET /api/students
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    tracing::info!("getting all student records");
    let students = state.storage.get_students().await.map_err(|e| {
        tracing::error!(error = %e, "listing students failed");
        e
    })?;
    Ok(Json(students))
}

/// PUT /api/student/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody<StudentPayload>,
) -> Result<(StatusCode, Json<StudentWritten>), AppError> {
    let student = body.validate()?;
    let id = parse_id(&id_str)?;
    let updated = state
        .storage
        .update_student_by_id(id, &student)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id, "updating student failed");
            e
        })?;
    tracing::info!(name = %updated.name, email = %updated.email, id, "updated student record");
    Ok(response::updated(updated))
}
