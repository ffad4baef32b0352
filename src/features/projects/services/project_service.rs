use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::comments::models::{CommentWithAuthor, COMMENT_WITH_AUTHOR_SELECT};
use crate::features::projects::dtos::{
    image_extension, BrowseFilter, ImageUpload, ProjectDetailDto, ProjectFormDto,
    ProjectResponseDto,
};
use crate::features::projects::models::{Project, ProjectWithCategory, PROJECT_COLUMNS};
use crate::features::schedules::models::{Schedule, SCHEDULE_COLUMNS};
use crate::modules::storage::ImageStorage;
use crate::shared::sql::{
    bind_all, bind_all_scalar, contains_pattern, existing_slugs, BindValue, WhereClause,
};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::{slug_base, unique_slug};

/// `SELECT` of projects joined with their category; `p` is the project alias
fn select_with_category() -> String {
    format!(
        "SELECT {}, c.name AS category_name, c.slug AS category_slug \
         FROM projects p JOIN categories c ON c.id = p.category_id",
        PROJECT_COLUMNS
    )
}

/// WHERE clause for the public browser: category equality AND (title OR description) match
fn browse_clause(filter: &BrowseFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    if let Some(category_id) = filter.category {
        clause.push("p.category_id = {}", BindValue::Int(category_id));
    }
    if let Some(search) = &filter.search {
        clause.push(
            "(p.title ILIKE {} OR p.description ILIKE {})",
            BindValue::Text(contains_pattern(search)),
        );
    }
    clause
}

/// Storage path for an uploaded image: `projects/<uuid>-<name>.<ext>`
fn image_path(image: &ImageUpload) -> String {
    let stem = image
        .file_name
        .rsplit_once('.')
        .map_or(image.file_name.as_str(), |(stem, _)| stem);
    let extension = image_extension(&image.content_type).unwrap_or("bin");
    format!(
        "projects/{}-{}.{}",
        Uuid::now_v7(),
        slug_base(stem),
        extension
    )
}

/// Service for project operations
pub struct ProjectService {
    pool: PgPool,
    storage: Arc<dyn ImageStorage>,
}

impl ProjectService {
    pub fn new(pool: PgPool, storage: Arc<dyn ImageStorage>) -> Self {
        Self { pool, storage }
    }

    /// All projects, newest first (dashboard listing)
    pub async fn list(&self, pagination: &PaginationQuery) -> Result<(Vec<ProjectResponseDto>, i64)> {
        self.browse(&BrowseFilter::default(), pagination).await
    }

    /// Filtered, paginated project listing ordered newest first.
    /// Returns (projects, total_count)
    pub async fn browse(
        &self,
        filter: &BrowseFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ProjectResponseDto>, i64)> {
        let clause = browse_clause(filter);
        let where_sql = clause.to_sql();

        let count_query = format!("SELECT COUNT(*) FROM projects p {}", where_sql);
        let total: i64 = bind_all_scalar(sqlx::query_scalar(&count_query), clause.binds())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count projects: {:?}", e);
                AppError::Database(e)
            })?;

        let limit_placeholder = format!("${}", clause.binds().len() + 1);
        let offset_placeholder = format!("${}", clause.binds().len() + 2);
        let query = format!(
            "{} {} ORDER BY p.created_at DESC, p.id DESC LIMIT {} OFFSET {}",
            select_with_category(),
            where_sql,
            limit_placeholder,
            offset_placeholder
        );
        let rows: Vec<ProjectWithCategory> = bind_all(sqlx::query_as(&query), clause.binds())
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to browse projects: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((rows.into_iter().map(ProjectResponseDto::from).collect(), total))
    }

    /// Every project of a category, in id order
    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<ProjectResponseDto>> {
        let query = format!(
            "{} WHERE p.category_id = $1 ORDER BY p.id",
            select_with_category()
        );
        let rows: Vec<ProjectWithCategory> = sqlx::query_as(&query)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list projects of category {}: {:?}", category_id, e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(ProjectResponseDto::from).collect())
    }

    /// Newest projects for the home page
    pub async fn featured(&self, limit: i64) -> Result<Vec<ProjectResponseDto>> {
        let query = format!(
            "{} ORDER BY p.created_at DESC, p.id DESC LIMIT $1",
            select_with_category()
        );
        let rows: Vec<ProjectWithCategory> = sqlx::query_as(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get featured projects: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(ProjectResponseDto::from).collect())
    }

    /// Newest projects of the same category, excluding `current_id`
    pub async fn related(
        &self,
        current_id: i64,
        category_id: i64,
        limit: i64,
    ) -> Result<Vec<ProjectResponseDto>> {
        let query = format!(
            "{} WHERE p.category_id = $1 AND p.id <> $2 \
             ORDER BY p.created_at DESC, p.id DESC LIMIT $3",
            select_with_category()
        );
        let rows: Vec<ProjectWithCategory> = sqlx::query_as(&query)
            .bind(category_id)
            .bind(current_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get related projects of {}: {:?}", current_id, e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(ProjectResponseDto::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ProjectResponseDto>> {
        let query = format!("{} WHERE p.id = $1", select_with_category());
        let row: Option<ProjectWithCategory> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get project {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(row.map(ProjectResponseDto::from))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<ProjectResponseDto>> {
        let query = format!("{} WHERE p.slug = $1", select_with_category());
        let row: Option<ProjectWithCategory> = sqlx::query_as(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get project by slug '{}': {:?}", slug, e);
                AppError::Database(e)
            })?;

        Ok(row.map(ProjectResponseDto::from))
    }

    /// Project with category, schedules (by start) and comments (newest first)
    pub async fn find_with_relations(&self, id: i64) -> Result<Option<ProjectDetailDto>> {
        match self.find_by_id(id).await? {
            Some(project) => self.with_relations(project).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn find_with_relations_by_slug(&self, slug: &str) -> Result<Option<ProjectDetailDto>> {
        match self.find_by_slug(slug).await? {
            Some(project) => self.with_relations(project).await.map(Some),
            None => Ok(None),
        }
    }

    async fn with_relations(&self, project: ProjectResponseDto) -> Result<ProjectDetailDto> {
        let id = project.id;

        let schedules_query = format!(
            "SELECT {} FROM schedules s WHERE s.project_id = $1 ORDER BY s.scheduled_at, s.id",
            SCHEDULE_COLUMNS
        );
        let schedules: Vec<Schedule> = sqlx::query_as(&schedules_query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get schedules of project {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        let comments_query = format!(
            "{} WHERE c.project_id = $1 ORDER BY c.created_at DESC, c.id DESC",
            COMMENT_WITH_AUTHOR_SELECT
        );
        let comments: Vec<CommentWithAuthor> = sqlx::query_as(&comments_query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get comments of project {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(ProjectDetailDto {
            project,
            schedules: schedules.into_iter().map(Into::into).collect(),
            comments: comments.into_iter().map(Into::into).collect(),
        })
    }

    /// Create a project, uploading its image first when one is given
    pub async fn create(
        &self,
        form: ProjectFormDto,
        image: Option<ImageUpload>,
    ) -> Result<ProjectResponseDto> {
        self.ensure_category_exists(form.category_id).await?;

        let slug = match &form.slug {
            Some(slug) => slug.clone(),
            None => self.generated_slug(&form.title, None).await?,
        };

        let image_url = match &image {
            Some(image) => Some(self.upload_image(image).await?),
            None => None,
        };

        let query = format!(
            r#"
            INSERT INTO projects (title, image, slug, link, description, category_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PROJECT_COLUMNS.replace("p.", "")
        );
        let inserted: std::result::Result<Project, sqlx::Error> = sqlx::query_as(&query)
            .bind(&form.title)
            .bind(&image_url)
            .bind(&slug)
            .bind(&form.link)
            .bind(&form.description)
            .bind(form.category_id)
            .bind(form.start_date)
            .bind(form.end_date)
            .fetch_one(&self.pool)
            .await;

        let project = match inserted {
            Ok(project) => project,
            Err(e) => {
                if let Some(url) = &image_url {
                    self.discard_image(url).await;
                }
                return Err(handle_db_error(e));
            }
        };

        info!("Project {} created with slug '{}'", project.id, project.slug);
        self.find_by_id(project.id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Project {} vanished after insert", project.id)))
    }

    /// Replace a project's fields. A new image replaces (and deletes) the old one.
    pub async fn update(
        &self,
        id: i64,
        form: ProjectFormDto,
        image: Option<ImageUpload>,
    ) -> Result<ProjectResponseDto> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project with id {} not found", id)))?;

        self.ensure_category_exists(form.category_id).await?;

        let slug = match &form.slug {
            Some(slug) => slug.clone(),
            None => self.generated_slug(&form.title, Some(id)).await?,
        };

        let new_image = match &image {
            Some(image) => Some(self.upload_image(image).await?),
            None => None,
        };
        let image_url = new_image.clone().or_else(|| existing.image.clone());

        let updated = sqlx::query(
            r#"
            UPDATE projects
            SET title = $2, image = $3, slug = $4, link = $5, description = $6,
                category_id = $7, start_date = $8, end_date = $9, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&form.title)
        .bind(&image_url)
        .bind(&slug)
        .bind(&form.link)
        .bind(&form.description)
        .bind(form.category_id)
        .bind(form.start_date)
        .bind(form.end_date)
        .execute(&self.pool)
        .await;

        if let Err(e) = updated {
            if let Some(url) = &new_image {
                self.discard_image(url).await;
            }
            return Err(handle_db_error(e));
        }

        if let (Some(_), Some(old)) = (&new_image, &existing.image) {
            self.discard_image(old).await;
        }

        info!("Project {} updated", id);
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project with id {} not found", id)))
    }

    /// Delete a project and its image. Schedules and comments go with it.
    ///
    /// The row delete is rolled back when the image cannot be removed.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let deleted: Option<Option<String>> =
            sqlx::query_scalar("DELETE FROM projects WHERE id = $1 RETURNING image")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(handle_db_error)?;

        let image = deleted
            .ok_or_else(|| AppError::NotFound(format!("Project with id {} not found", id)))?;

        if let Some(url) = image {
            self.storage.delete_by_url(&url).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        info!("Project {} deleted", id);
        Ok(())
    }

    /// Substring match on title or description
    pub async fn search(&self, term: &str, limit: i64) -> Result<Vec<Project>> {
        let query = format!(
            r#"
            SELECT {} FROM projects p
            WHERE p.title ILIKE $1 OR p.description ILIKE $1
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2
            "#,
            PROJECT_COLUMNS
        );
        sqlx::query_as(&query)
            .bind(contains_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search projects: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn ensure_category_exists(&self, category_id: i64) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if exists {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "category_id: category {} does not exist",
                category_id
            )))
        }
    }

    async fn generated_slug(&self, title: &str, exclude_id: Option<i64>) -> Result<String> {
        let base = slug_base(title);
        let taken = existing_slugs(&self.pool, "projects", &base, exclude_id)
            .await
            .map_err(AppError::Database)?;
        Ok(unique_slug(&base, &taken))
    }

    async fn upload_image(&self, image: &ImageUpload) -> Result<String> {
        image.check()?;
        self.storage
            .upload(&image_path(image), image.data.clone(), &image.content_type)
            .await
    }

    /// Best-effort removal of an image no row points at anymore
    async fn discard_image(&self, url: &str) {
        if let Err(e) = self.storage.delete_by_url(url).await {
            warn!("Failed to remove orphaned image '{}': {}", url, e);
        }
    }
}
