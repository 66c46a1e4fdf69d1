//! Shared application state for all routes.

use crate::store::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Built once at startup by the storage factory.
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}
