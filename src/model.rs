//! Student record and the request payload that produces it.

use crate::error::AppError;
use crate::service::{FieldValue, Format, RequestValidator, ValidationRule};
use serde::{Deserialize, Serialize};

pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 100;

const NAME_RULE: ValidationRule = ValidationRule {
    required: true,
    format: None,
    minimum: None,
    maximum: None,
};

const EMAIL_RULE: ValidationRule = ValidationRule {
    required: true,
    format: Some(Format::Email),
    minimum: None,
    maximum: None,
};

const AGE_RULE: ValidationRule = ValidationRule {
    required: true,
    format: None,
    minimum: Some(MIN_AGE as i64),
    maximum: Some(MAX_AGE as i64),
};

/// A persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// Request body for create and update. Fields are optional so that a missing
/// field is reported by validation instead of failing the JSON decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

/// Validated student fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub age: i32,
}

impl StudentPayload {
    pub fn validate(self) -> Result<NewStudent, AppError> {
        RequestValidator::new()
            .check("name", FieldValue::Text(self.name.as_deref()), &NAME_RULE)
            .check("email", FieldValue::Text(self.email.as_deref()), &EMAIL_RULE)
            .check("age", FieldValue::Int(self.age.map(i64::from)), &AGE_RULE)
            .finish()?;
        match (self.name, self.email, self.age) {
            (Some(name), Some(email), Some(age)) => Ok(NewStudent { name, email, age }),
            _ => Err(AppError::BadRequest("incomplete student payload".into())),
        }
    }
}

impl NewStudent {
    pub fn with_id(self, id: i64) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}
