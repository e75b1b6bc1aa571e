//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use inkpot_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// List posts, newest first, optionally filtered by category and kind.
    pub async fn list(
        &self,
        category: Option<&str>,
        kind: Option<post::PostKind>,
    ) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find().order_by_desc(post::Column::CreatedAt);

        if let Some(c) = category {
            query = query.filter(post::Column::Category.eq(c));
        }

        if let Some(k) = kind {
            query = query.filter(post::Column::Kind.eq(k));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post. Likes go with it via the cascading foreign key.
    pub async fn delete(&self, model: post::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment view count atomically (single UPDATE query, no fetch).
    pub async fn increment_views(&self, post_id: &str) -> AppResult<()> {
        Post::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::post::PostKind;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_post(id: &str, kind: PostKind, category: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            kind,
            title: "Title".to_string(),
            category: category.to_string(),
            author_id: "u1".to_string(),
            author_name: "alice".to_string(),
            content: None,
            excerpt: None,
            cover_image: None,
            image_gallery: None,
            music_url: None,
            local_music: None,
            music_desc: None,
            video_url: None,
            local_video: None,
            video_desc: None,
            views: 0,
            likes: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let post = create_test_post("p1", PostKind::Article, "tech");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_id("p1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().kind, PostKind::Article);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_errors() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_unfiltered() {
        let p1 = create_test_post("p1", PostKind::Article, "tech");
        let p2 = create_test_post("p2", PostKind::Music, "life");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.list(None, None).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let p1 = create_test_post("p1", PostKind::Video, "travel");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo
            .list(Some("travel"), Some(PostKind::Video))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, "travel");
    }

    #[tokio::test]
    async fn test_increment_views() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert!(repo.increment_views("p1").await.is_ok());
    }
}
