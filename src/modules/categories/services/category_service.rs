use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::categories::{
    models::{Category, CategoryRequest},
    repositories::CategoryRepository,
};

/// Business rules for category management
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    /// Create a category, defaulting color and icon when blank
    pub async fn create(&self, request: CategoryRequest) -> Result<Category> {
        let category = request.validate()?;
        let created = self.repository.create(&category).await?;

        info!(category_id = created.id, name = %created.name, "Category created");
        Ok(created)
    }

    pub async fn get_all(&self) -> Result<Vec<Category>> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Category> {
        ensure_valid_id(id)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("category {}", id)))
    }

    pub async fn update(&self, id: i64, request: CategoryRequest) -> Result<Category> {
        ensure_valid_id(id)?;
        let category = request.validate()?;

        let updated = self
            .repository
            .update(id, &category)
            .await?
            .ok_or_else(|| AppError::not_found(format!("category {}", id)))?;

        info!(category_id = id, "Category updated");
        Ok(updated)
    }

    /// Hard delete; transactions filed under it lose their category reference
    pub async fn delete(&self, id: i64) -> Result<()> {
        ensure_valid_id(id)?;

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found(format!("category {}", id)));
        }

        info!(category_id = id, "Category deleted");
        Ok(())
    }
}

fn ensure_valid_id(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(AppError::validation("invalid category id"));
    }
    Ok(())
}
