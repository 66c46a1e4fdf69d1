//! Success envelope for write endpoints.

use crate::model::Student;
use axum::{http::StatusCode, Json};
use serde::Serialize;

pub const CREATED_MESSAGE: &str = "Student record created successfully";
pub const UPDATED_MESSAGE: &str = "Student record updated successfully";

#[derive(Debug, Serialize)]
pub struct StudentWritten {
    pub success: bool,
    pub id: i64,
    pub student: Student,
    pub message: &'static str,
}

pub fn created(student: Student) -> (StatusCode, Json<StudentWritten>) {
    (StatusCode::CREATED, Json(written(student, CREATED_MESSAGE)))
}

pub fn updated(student: Student) -> (StatusCode, Json<StudentWritten>) {
    (StatusCode::OK, Json(written(student, UPDATED_MESSAGE)))
}

fn written(student: Student, message: &'static str) -> StudentWritten {
    StudentWritten {
        success: true,
        id: student.id,
        student,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let student = Student { id: 3, name: "Ada".into(), email: "ada@x.com".into(), age: 30 };
        let (status, Json(body)) = created(student);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "success": true,
                "id": 3,
                "student": {"id": 3, "name": "Ada", "email": "ada@x.com", "age": 30},
                "message": CREATED_MESSAGE
            })
        );
    }
}
