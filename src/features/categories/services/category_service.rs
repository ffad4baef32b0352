use sqlx::PgPool;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryResponseDto, CategoryWithCountDto, CreateCategoryDto,
    UpdateCategoryDto,
};
use crate::features::categories::models::{Category, CategoryWithCount};
use crate::features::projects::dtos::ProjectResponseDto;
use crate::features::projects::models::{Project, PROJECT_COLUMNS};
use crate::shared::sql::{contains_pattern, existing_slugs};
use crate::shared::validation::{slug_base, unique_slug};

const CATEGORY_COLUMNS: &str = "id, name, description, slug, created_at, updated_at";

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All categories, alphabetical (public filters and the home page)
    pub async fn list_all(&self) -> Result<Vec<CategoryResponseDto>> {
        let query = format!(
            "SELECT {} FROM categories ORDER BY name, id",
            CATEGORY_COLUMNS
        );
        let categories: Vec<Category> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// All categories with their project counts, in id order
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCountDto>> {
        let categories: Vec<CategoryWithCount> = sqlx::query_as(
            r#"
            SELECT c.id, c.name, c.description, c.slug, COUNT(p.id) AS projects_count
            FROM categories c
            LEFT JOIN projects p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories with counts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Categories with the most projects; ties go to the lower id
    pub async fn popular(&self, limit: i64) -> Result<Vec<CategoryWithCountDto>> {
        let categories: Vec<CategoryWithCount> = sqlx::query_as(
            r#"
            SELECT c.id, c.name, c.description, c.slug, COUNT(p.id) AS projects_count
            FROM categories c
            LEFT JOIN projects p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY projects_count DESC, c.id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get popular categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CategoryResponseDto>> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        let category: Option<Category> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(category.map(|c| c.into()))
    }

    /// Category together with every project filed under it
    pub async fn find_with_projects(&self, id: i64) -> Result<Option<CategoryDetailDto>> {
        let Some(category) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {} FROM projects p WHERE p.category_id = $1 ORDER BY p.created_at DESC, p.id DESC",
            PROJECT_COLUMNS
        );
        let projects: Vec<Project> = sqlx::query_as(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get projects of category {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(Some(CategoryDetailDto {
            category,
            projects: projects.into_iter().map(ProjectResponseDto::from).collect(),
        }))
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let slug = match dto.slug {
            Some(slug) => slug,
            None => self.generated_slug(&dto.name, None).await?,
        };

        let query = format!(
            "INSERT INTO categories (name, description, slug) VALUES ($1, $2, $3) RETURNING {}",
            CATEGORY_COLUMNS
        );
        let category: Category = sqlx::query_as(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&slug)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        tracing::info!("Category {} created with slug '{}'", category.id, slug);
        Ok(category.into())
    }

    pub async fn update(&self, id: i64, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let query = format!(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                slug = COALESCE($4, slug),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let category: Category = sqlx::query_as(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;

        tracing::info!("Category {} updated", id);
        Ok(category.into())
    }

    /// Delete a category that no project references.
    ///
    /// The category row is locked for the duration of the check so a project
    /// cannot be attached between the count and the delete.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;

        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        let in_use: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE category_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Category is still used by {} project(s)",
                in_use
            )));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!("Category {} deleted", id);
        Ok(())
    }

    /// Substring match on name or description
    pub async fn search(&self, term: &str, limit: i64) -> Result<Vec<Category>> {
        let query = format!(
            r#"
            SELECT {} FROM categories
            WHERE name ILIKE $1 OR description ILIKE $1
            ORDER BY id
            LIMIT $2
            "#,
            CATEGORY_COLUMNS
        );
        sqlx::query_as(&query)
            .bind(contains_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search categories: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn generated_slug(&self, name: &str, exclude_id: Option<i64>) -> Result<String> {
        let base = slug_base(name);
        let taken = existing_slugs(&self.pool, "categories", &base, exclude_id)
            .await
            .map_err(AppError::Database)?;
        Ok(unique_slug(&base, &taken))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::projects::dtos::ProjectFormDto;
    use crate::features::projects::ProjectService;
    use crate::modules::storage::memory::MemoryStorage;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn create_dto(name: &str) -> CreateCategoryDto {
        CreateCategoryDto {
            name: name.to_string(),
            description: None,
            slug: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_generated_slugs_are_suffixed(pool: PgPool) {
        let service = CategoryService::new(pool);

        let first = service.create(create_dto("Web Apps")).await.unwrap();
        let second = service.create(create_dto("Web Apps")).await.unwrap();

        assert_eq!(first.slug.as_deref(), Some("web-apps"));
        assert_eq!(second.slug.as_deref(), Some("web-apps-2"));

        let explicit = CreateCategoryDto {
            slug: Some("web-apps".to_string()),
            ..create_dto("Other")
        };
        assert!(matches!(
            service.create(explicit).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_longest_names_get_distinct_slugs(pool: PgPool) {
        let service = CategoryService::new(pool);
        let name = "n".repeat(255);

        let first = service.create(create_dto(&name)).await.unwrap();
        let second = service.create(create_dto(&name)).await.unwrap();

        let first = first.slug.unwrap();
        let second = second.slug.unwrap();
        assert_eq!(first.len(), 255);
        assert_eq!(second.len(), 255);
        assert!(second.ends_with("-2"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_is_blocked_while_projects_reference_category(pool: PgPool) {
        let categories = CategoryService::new(pool.clone());
        let projects = ProjectService::new(pool.clone(), Arc::new(MemoryStorage::default()));

        let category = categories.create(create_dto("Mobile")).await.unwrap();
        let project = projects
            .create(
                ProjectFormDto {
                    title: "Kasir App".to_string(),
                    slug: None,
                    link: None,
                    description: None,
                    category_id: category.id,
                    start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    end_date: None,
                },
                None,
            )
            .await
            .unwrap();

        assert!(matches!(
            categories.delete(category.id).await,
            Err(AppError::Conflict(_))
        ));

        projects.delete(project.id).await.unwrap();
        categories.delete(category.id).await.unwrap();
        assert!(categories.find_by_id(category.id).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_popular_breaks_ties_by_id(pool: PgPool) {
        let service = CategoryService::new(pool);
        let a = service.create(create_dto("A")).await.unwrap();
        let b = service.create(create_dto("B")).await.unwrap();

        let popular = service.popular(6).await.unwrap();
        let ids: Vec<i64> = popular.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert!(popular.iter().all(|c| c.projects_count == 0));
    }
}
