use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::categories::models::{Category, NewCategory};

/// Storage contract for categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category and return it with its assigned id and timestamps
    async fn create(&self, category: &NewCategory) -> Result<Category>;

    /// All categories ordered by name
    async fn find_all(&self) -> Result<Vec<Category>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Overwrite a category; `None` when no row has this id
    async fn update(&self, id: i64, category: &NewCategory) -> Result<Option<Category>>;

    /// Hard delete; `false` when no row has this id
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// MySQL-backed category repository
pub struct MySqlCategoryRepository {
    pool: MySqlPool,
}

impl MySqlCategoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Unique-name collisions are caller mistakes, not store failures
fn map_write_error(operation: &str, err: sqlx::Error) -> AppError {
    let duplicate = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if duplicate {
        AppError::validation("category name already exists")
    } else {
        AppError::persistence(operation, err)
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn create(&self, category: &NewCategory) -> Result<Category> {
        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, description, color, icon)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.color)
        .bind(&category.icon)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("create category", e))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Category was created but not found"))
    }

    async fn find_all(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color, icon, created_at, updated_at
            FROM categories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::persistence("get categories", e))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color, icon, created_at, updated_at
            FROM categories
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::persistence("get category", e))
    }

    async fn update(&self, id: i64, category: &NewCategory) -> Result<Option<Category>> {
        sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, description = ?, color = ?, icon = ?, updated_at = UTC_TIMESTAMP()
            WHERE id = ?
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.color)
        .bind(&category.icon)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("update category", e))?;

        // MySQL reports zero affected rows for no-op updates, so re-read instead
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persistence("delete category", e))?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
