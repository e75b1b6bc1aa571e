//! Like service.

use inkpot_common::{AppError, AppResult, IdGenerator};
use inkpot_db::repositories::{PostLikeRepository, PostRepository, post_like::ToggleOutcome};

/// Like service: strict toggle over the (post, user) membership.
#[derive(Clone)]
pub struct LikeService {
    post_repo: PostRepository,
    like_repo: PostLikeRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub fn new(post_repo: PostRepository, like_repo: PostLikeRepository) -> Self {
        Self {
            post_repo,
            like_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle a like. Returns the resulting count and membership state.
    pub async fn toggle(&self, user_id: &str, post_id: &str) -> AppResult<ToggleOutcome> {
        // Existence first, so a missing post is NotFound rather than a no-op
        if self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(AppError::PostNotFound(post_id.to_string()));
        }

        let outcome = self
            .like_repo
            .toggle(post_id, user_id, self.id_gen.generate())
            .await?;

        tracing::debug!(
            post_id,
            user_id,
            likes = outcome.likes,
            liked = outcome.liked,
            "Like toggled"
        );

        Ok(outcome)
    }

    /// Whether the user currently likes the post.
    pub async fn has_liked(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        self.like_repo.has_liked(post_id, user_id).await
    }
}
