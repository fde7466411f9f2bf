//! HTTP API for the daily word webhook

mod handlers;
mod types;

pub use handlers::create_router;

use crate::catalog::Catalog;
use crate::progress::ProgressStore;
use crate::rotation::Rotation;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub rotation: Arc<Rotation>,
}

impl AppState {
    pub fn new(catalog: Catalog, progress: ProgressStore) -> Self {
        Self {
            rotation: Arc::new(Rotation::new(Arc::new(catalog), Arc::new(progress))),
        }
    }
}
