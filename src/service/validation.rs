//! Request validation from per-field rules.

use crate::error::{AppError, FieldError};
use regex::Regex;
use std::sync::OnceLock;

/// Constraints for one request field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationRule {
    pub required: bool,
    pub format: Option<Format>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
}

/// Borrowed view of a field value as it arrived in the request.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Int(Option<i64>),
}

impl FieldValue<'_> {
    fn is_missing(&self) -> bool {
        match self {
            FieldValue::Text(v) => v.map_or(true, |s| s.trim().is_empty()),
            FieldValue::Int(v) => v.is_none(),
        }
    }
}

/// Collects every failing field so the client sees all problems in one response.
#[derive(Debug, Default)]
pub struct RequestValidator {
    errors: Vec<FieldError>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &'static str, value: FieldValue<'_>, rule: &ValidationRule) -> &mut Self {
        if value.is_missing() {
            if rule.required {
                self.fail(field, format!("{} is required", field));
            }
            return self;
        }
        match value {
            FieldValue::Text(Some(s)) => {
                if rule.format == Some(Format::Email) && !is_email(s) {
                    self.fail(field, format!("{} must be a valid email", field));
                }
            }
            FieldValue::Int(Some(n)) => {
                if let Some(min) = rule.minimum {
                    if n < min {
                        self.fail(field, format!("{} must be at least {}", field, min));
                    }
                }
                if let Some(max) = rule.maximum {
                    if n > max {
                        self.fail(field, format!("{} must be at most {}", field, max));
                    }
                }
            }
            _ => {}
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }

    fn fail(&mut self, field: &'static str, message: String) {
        self.errors.push(FieldError { field, message });
    }
}

fn is_email(s: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
            .expect("email regex is valid")
    });
    re.is_match(s)
}
