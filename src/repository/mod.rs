//! Data access for products.
//!
//! Every operation only ever sees live rows: soft-deleted products are
//! filtered here, so callers never have to remember the `deleted_at` predicate.

pub mod postgres;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use crate::models::product::Product;

pub use postgres::PgProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("product {0} not found")]
    NotFound(i64),

    #[error("product {0} was not persisted")]
    NotPersisted(i64),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All live products in primary-key order.
    async fn list_all(&self) -> RepositoryResult<Vec<Product>>;

    /// Insert a product; id and timestamps come from the store.
    async fn create(&self, name: &str, price: i64) -> RepositoryResult<Product>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Product>;

    /// Write `name` and `price` of an existing live row and return what the
    /// store now holds. A row that is absent or was soft-deleted since it was
    /// read is `NotFound`; any other write that affects zero rows is
    /// `NotPersisted`.
    async fn save(&self, product: &Product) -> RepositoryResult<Product>;

    /// Soft delete. Absent and already deleted rows are `NotFound`.
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;
}
