//! Post like repository.

use std::sync::Arc;

use crate::entities::{Post, PostLike, post, post_like};
use chrono::Utc;
use inkpot_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Like count after the toggle.
    pub likes: i32,
    /// Whether the acting user now likes the post.
    pub liked: bool,
}

/// Post like repository for database operations.
#[derive(Clone)]
pub struct PostLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl PostLikeRepository {
    /// Create a new post like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a user has liked a post.
    pub async fn has_liked(&self, post_id: &str, user_id: &str) -> AppResult<bool> {
        let existing = PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(existing.is_some())
    }

    /// Toggle a like for (post, user).
    ///
    /// The like row and the post's `likes` counter change inside one
    /// transaction so the counter always matches the row count.
    pub async fn toggle(
        &self,
        post_id: &str,
        user_id: &str,
        like_id: String,
    ) -> AppResult<ToggleOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let liked = if let Some(row) = existing {
            row.delete(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            Post::update_many()
                .col_expr(post::Column::Likes, Expr::cust("GREATEST(likes - 1, 0)"))
                .filter(post::Column::Id.eq(post_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            false
        } else {
            post_like::ActiveModel {
                id: Set(like_id),
                post_id: Set(post_id.to_string()),
                user_id: Set(user_id.to_string()),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            Post::update_many()
                .col_expr(post::Column::Likes, Expr::col(post::Column::Likes).add(1))
                .filter(post::Column::Id.eq(post_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            true
        };

        let updated = Post::find_by_id(post_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::PostNotFound(post_id.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ToggleOutcome {
            likes: updated.likes,
            liked,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::post::PostKind;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_like(id: &str, post_id: &str, user_id: &str) -> post_like::Model {
        post_like::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn create_test_post(id: &str, likes: i32) -> post::Model {
        post::Model {
            id: id.to_string(),
            kind: PostKind::Article,
            title: "Title".to_string(),
            category: "tech".to_string(),
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
            likes,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_has_liked_true() {
        let like = create_test_like("l1", "p1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        assert!(repo.has_liked("p1", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_has_liked_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post_like::Model>::new()])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        assert!(!repo.has_liked("p1", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_adds_like_when_absent() {
        let inserted = create_test_like("l1", "p1", "u2");
        let updated = create_test_post("p1", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // no existing like
                .append_query_results([Vec::<post_like::Model>::new()])
                // insert returns the new row
                .append_query_results([[inserted]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                // re-read of the post after the counter update
                .append_query_results([[updated]])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        let outcome = repo.toggle("p1", "u2", "l1".to_string()).await.unwrap();

        assert!(outcome.liked);
        assert_eq!(outcome.likes, 1);
    }

    #[tokio::test]
    async fn test_toggle_removes_like_when_present() {
        let existing = create_test_like("l1", "p1", "u2");
        let updated = create_test_post("p1", 0);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        let outcome = repo.toggle("p1", "u2", "unused".to_string()).await.unwrap();

        assert!(!outcome.liked);
        assert_eq!(outcome.likes, 0);
    }
}
