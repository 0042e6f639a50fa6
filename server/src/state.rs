use std::sync::Arc;

use crate::store::EventStore;

/// Shared handler state. The store is chosen once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }
}
