use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, instrument};
use crate::models::product::Product;
use super::{ProductRepository, RepositoryError, RepositoryResult};

#[derive(Clone)]
pub struct PgProductRepository {
    db_pool: PgPool,
}

impl PgProductRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        match sqlx::query_as::<_, Product>(
            "SELECT id, created_at, updated_at, deleted_at, name, price
             FROM products
             WHERE deleted_at IS NULL
             ORDER BY id"
        )
            .fetch_all(&self.db_pool)
            .await {
            Ok(products) => Ok(products),
            Err(e) => {
                error!(?e, "Failed to fetch products");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn create(&self, name: &str, price: i64) -> RepositoryResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, price)
             VALUES ($1, $2)
             RETURNING id, created_at, updated_at, deleted_at, name, price"
        )
        .bind(name)
        .bind(price)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Product> {
        sqlx::query_as::<_, Product>(
            "SELECT id, created_at, updated_at, deleted_at, name, price
             FROM products
             WHERE id = $1 AND deleted_at IS NULL"
        )
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
        .ok_or(RepositoryError::NotFound(id))
    }

    #[instrument(skip(self, product), fields(id = product.id))]
    async fn save(&self, product: &Product) -> RepositoryResult<Product> {
        let saved = sqlx::query_as::<_, Product>(
            "UPDATE products SET
             name = $2,
             price = $3,
             updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, created_at, updated_at, deleted_at, name, price"
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .fetch_optional(&self.db_pool)
        .await?;

        if let Some(saved) = saved {
            return Ok(saved);
        }

        // Zero rows: either the product was soft-deleted after the caller
        // read it, or the write genuinely did not land.
        let live = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND deleted_at IS NULL)"
        )
            .bind(product.id)
            .fetch_one(&self.db_pool)
            .await?;

        if live {
            error!(id = product.id, "Update matched no rows on a live product");
            Err(RepositoryError::NotPersisted(product.id))
        } else {
            Err(RepositoryError::NotFound(product.id))
        }
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL"
        )
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        tracing::info!(product_id = id, "Soft-deleted product");
        Ok(())
    }
}
