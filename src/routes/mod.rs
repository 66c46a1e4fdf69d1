//! Route tables. Each function returns a stateless `Router` ready to merge.

pub mod common;
pub mod student;

pub use common::common_routes;
pub use student::student_routes;
