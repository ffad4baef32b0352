use sqlx::PgPool;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto, RecentCommentDto};
use crate::features::comments::models::{CommentWithAuthor, RecentComment, COMMENT_WITH_AUTHOR_SELECT};
use crate::shared::types::PaginationQuery;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Comments of a project, newest first
    /// Returns (comments, total_count)
    pub async fn list_by_project(
        &self,
        project_id: i64,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<CommentResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count comments of project {}: {:?}", project_id, e);
                AppError::Database(e)
            })?;

        let sql = format!(
            "{} WHERE c.project_id = $1 ORDER BY c.created_at DESC, c.id DESC LIMIT $2 OFFSET $3",
            COMMENT_WITH_AUTHOR_SELECT
        );
        let rows: Vec<CommentWithAuthor> = sqlx::query_as(&sql)
            .bind(project_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list comments of project {}: {:?}", project_id, e);
                AppError::Database(e)
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Latest comments across all projects
    pub async fn recent(&self, limit: i64) -> Result<Vec<RecentCommentDto>> {
        let rows: Vec<RecentComment> = sqlx::query_as(
            r#"
            SELECT c.id, c.body, c.user_id, c.project_id, c.created_at, c.updated_at,
                   u.name AS author_name, p.title AS project_title, p.slug AS project_slug
            FROM comments c
            JOIN users u ON u.id = c.user_id
            JOIN projects p ON p.id = c.project_id
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get recent comments: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create(
        &self,
        project_id: i64,
        user_id: i64,
        dto: CreateCommentDto,
    ) -> Result<CommentResponseDto> {
        let body = dto.body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("body: must not be blank".to_string()));
        }

        let project_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)")
                .bind(project_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
        if !project_exists {
            return Err(AppError::NotFound(format!(
                "Project with id {} not found",
                project_id
            )));
        }

        let row: CommentWithAuthor = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO comments (body, user_id, project_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT i.id, i.body, i.user_id, i.project_id, i.created_at, i.updated_at,
                   u.name AS author_name
            FROM inserted i JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(body)
        .bind(user_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!(
            "Comment {} added to project {} by user {}",
            row.comment.id,
            project_id,
            user_id
        );
        Ok(row.into())
    }

    /// Delete a comment the user owns; admins may delete any comment
    pub async fn delete(&self, id: i64, user: &AuthenticatedUser) -> Result<()> {
        let owner: Option<i64> = sqlx::query_scalar("SELECT user_id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let owner =
            owner.ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))?;
        if !user.can_modify(owner) {
            return Err(AppError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        tracing::info!("Comment {} deleted by user {}", id, user.user_id);
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_admin_user, create_regular_user};
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    async fn insert_user(pool: &PgPool, name: &str) -> i64 {
        let email: String = SafeEmail().fake();
        sqlx::query_scalar("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(format!("{}.{}", name.to_lowercase(), email))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn seed(pool: &PgPool) -> (i64, i64, i64) {
        let author = insert_user(pool, "Rina").await;
        let other = insert_user(pool, "Budi").await;
        let category: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, slug) VALUES ('Web', 'web') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        let project: i64 = sqlx::query_scalar(
            "INSERT INTO projects (title, slug, category_id, start_date) \
             VALUES ('Shop', 'shop', $1, CURRENT_DATE) RETURNING id",
        )
        .bind(category)
        .fetch_one(pool)
        .await
        .unwrap();
        (author, other, project)
    }

    fn body(text: &str) -> CreateCommentDto {
        CreateCommentDto {
            body: text.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_and_list_newest_first(pool: PgPool) {
        let service = CommentService::new(pool.clone());
        let (author, _, project) = seed(&pool).await;

        let first = service.create(project, author, body("First")).await.unwrap();
        let second = service.create(project, author, body(" Second ")).await.unwrap();
        assert_eq!(second.body, "Second");
        assert_eq!(second.author.name, "Rina");

        let (comments, total) = service
            .list_by_project(project, &PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(comments[0].id, second.id);
        assert_eq!(comments[1].id, first.id);

        let (beyond, total) = service
            .list_by_project(project, &PaginationQuery::new(i64::MAX, 10))
            .await
            .unwrap();
        assert!(beyond.is_empty());
        assert_eq!(total, 2);

        let missing = service.create(project + 100, author, body("Hi")).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_delete_checks_ownership(pool: PgPool) {
        let service = CommentService::new(pool.clone());
        let (author, other, project) = seed(&pool).await;

        let comment = service.create(project, author, body("Mine")).await.unwrap();

        let denied = service.delete(comment.id, &create_regular_user(other)).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        service
            .delete(comment.id, &create_regular_user(author))
            .await
            .unwrap();
        assert_eq!(service.count().await.unwrap(), 0);

        let again = service.create(project, author, body("Again")).await.unwrap();
        service.delete(again.id, &create_admin_user()).await.unwrap();

        let gone = service.delete(again.id, &create_admin_user()).await;
        assert!(matches!(gone, Err(AppError::NotFound(_))));
    }
}
