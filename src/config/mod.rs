pub mod loader;
pub mod types;

pub use types::*;
