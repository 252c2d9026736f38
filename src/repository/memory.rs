use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::models::product::Product;
use super::{ProductRepository, RepositoryError, RepositoryResult};

#[derive(Debug, Default, Clone, Copy)]
enum SaveMode {
    #[default]
    Normal,
    /// Every save reports zero affected rows on a live product.
    Fail,
    /// The product is soft-deleted right before the write lands.
    Vanish,
}

/// In-memory `ProductRepository` with the same soft-delete semantics as the
/// Postgres one. Rows are never removed, only stamped with `deleted_at`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    rows: Arc<RwLock<BTreeMap<i64, Product>>>,
    save_mode: SaveMode,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose `save` always reports zero affected rows.
    pub fn failing_saves() -> Self {
        Self { save_mode: SaveMode::Fail, ..Self::default() }
    }

    /// A repository where a concurrent delete always wins against `save`.
    pub fn vanishing_saves() -> Self {
        Self { save_mode: SaveMode::Vanish, ..Self::default() }
    }

    pub async fn stored(&self, id: i64) -> Option<Product> {
        self.rows.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|p| p.deleted_at.is_none()).cloned().collect())
    }

    async fn create(&self, name: &str, price: i64) -> RepositoryResult<Product> {
        let mut rows = self.rows.write().await;
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let now = Utc::now();
        let product = Product {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            name: name.to_string(),
            price,
        };
        rows.insert(id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Product> {
        let rows = self.rows.read().await;
        rows.get(&id)
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn save(&self, product: &Product) -> RepositoryResult<Product> {
        let mut rows = self.rows.write().await;
        let row = match rows.get_mut(&product.id) {
            Some(row) if row.deleted_at.is_none() => row,
            _ => return Err(RepositoryError::NotFound(product.id)),
        };

        match self.save_mode {
            SaveMode::Normal => {
                row.name = product.name.clone();
                row.price = product.price;
                row.updated_at = Utc::now();
                Ok(row.clone())
            }
            SaveMode::Fail => Err(RepositoryError::NotPersisted(product.id)),
            SaveMode::Vanish => {
                row.deleted_at = Some(Utc::now());
                Err(RepositoryError::NotFound(product.id))
            }
        }
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(row) if row.deleted_at.is_none() => {
                row.deleted_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(RepositoryError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_positive_and_increasing() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create("A", 1).await.unwrap();
        let b = repo.create("B", 2).await.unwrap();
        assert!(a.id > 0);
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn delete_keeps_the_row_but_hides_it() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create("A", 1).await.unwrap();

        repo.delete_by_id(a.id).await.unwrap();

        assert!(repo.stored(a.id).await.unwrap().deleted_at.is_some());
        assert!(matches!(repo.get_by_id(a.id).await, Err(RepositoryError::NotFound(_))));
        assert!(repo.list_all().await.unwrap().is_empty());
        assert!(matches!(repo.delete_by_id(a.id).await, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn saving_a_deleted_row_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create("A", 1).await.unwrap();
        repo.delete_by_id(a.id).await.unwrap();

        assert!(matches!(repo.save(&a).await, Err(RepositoryError::NotFound(id)) if id == a.id));
    }
}
