//! Request validation shared by the HTTP handlers.

mod validation;
pub use validation::{FieldValue, Format, RequestValidator, ValidationRule};
