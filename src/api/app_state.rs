use crate::storage::memory::MemoryProductRepository;
use crate::storage::repository::ProductRepository;
use std::sync::Arc;

/// Application state shared by all handlers
///
/// Holds no mutable data of its own; every request talks to the same storage.
#[derive(Clone)]
pub struct AppState {
    /// Product repository for product CRUD operations
    pub product_repository: Arc<dyn ProductRepository>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("product_repository", &"Arc<dyn ProductRepository>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(product_repository: Arc<dyn ProductRepository>) -> Self {
        Self { product_repository }
    }

    /// Create development application state backed by in-memory storage
    pub fn development() -> Self {
        Self::new(Arc::new(MemoryProductRepository::new()))
    }
}
