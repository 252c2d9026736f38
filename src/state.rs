// src/state.rs
use std::sync::Arc;
use sqlx::PgPool;
use crate::repository::{PgProductRepository, ProductRepository};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(db_pool: PgPool) -> Self {
        Self::with_repository(PgProductRepository::new(db_pool))
    }

    pub fn with_repository(repository: impl ProductRepository + 'static) -> Self {
        Self { products: Arc::new(repository) }
    }
}
