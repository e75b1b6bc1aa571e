//! Post service.

use chrono::Utc;
use inkpot_common::{AppError, AppResult, Config, IdGenerator, validate_inline_media};
use inkpot_db::{
    entities::{
        post::{self, PostKind},
        user,
    },
    repositories::PostRepository,
};
use sea_orm::{ActiveValue, Set};
use serde::Deserialize;
use validator::Validate;

/// Number of leading characters of an article used as its excerpt.
const EXCERPT_LEN: usize = 100;

/// Variant-specific payload of a post, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostBody {
    #[serde(rename_all = "camelCase")]
    Article {
        content: String,
        #[serde(default)]
        excerpt: Option<String>,
        #[serde(default)]
        cover_image: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        image_gallery: Vec<String>,
        #[serde(default)]
        cover_image: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Music {
        #[serde(default)]
        music_url: Option<String>,
        #[serde(default)]
        local_music: Option<String>,
        #[serde(default)]
        music_desc: Option<String>,
        #[serde(default)]
        cover_image: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        #[serde(default)]
        video_url: Option<String>,
        #[serde(default)]
        local_video: Option<String>,
        #[serde(default)]
        video_desc: Option<String>,
        #[serde(default)]
        cover_image: Option<String>,
    },
}

/// Input for creating a post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 512))]
    pub title: String,

    #[validate(length(min = 1, max = 128))]
    pub category: String,

    #[serde(flatten)]
    pub body: PostBody,
}

/// Listing filter. Both fields independently optional.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub kind: Option<PostKind>,
}

impl PostFilter {
    /// Build a filter from raw query parameters.
    ///
    /// Empty strings mean "no filter"; an unknown type is rejected.
    pub fn from_params(category: Option<String>, kind: Option<String>) -> AppResult<Self> {
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let kind = match kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                PostKind::parse(raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown post type: {raw}")))?,
            ),
        };

        Ok(Self { category, kind })
    }
}

/// Whether an actor may mutate a post.
#[must_use]
pub fn can_mutate(actor: &user::Model, post: &post::Model) -> bool {
    actor.id == post.author_id
}

/// Post service for creation, listing, detail, and deletion.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    id_gen: IdGenerator,
    max_inline_bytes: usize,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(post_repo: PostRepository, config: &Config) -> Self {
        Self {
            post_repo,
            id_gen: IdGenerator::new(),
            max_inline_bytes: config.media.max_inline_bytes,
        }
    }

    /// Create a post on behalf of its author.
    ///
    /// Author ID and name are stamped at this instant; the name is a snapshot
    /// and is not refreshed if the author later renames.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let title = input.title.trim().to_string();
        let category = input.category.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
        if category.is_empty() {
            return Err(AppError::Validation("Category must not be empty".to_string()));
        }

        let mut model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            kind: Set(PostKind::Article),
            title: Set(title),
            category: Set(category),
            author_id: Set(author.id.clone()),
            author_name: Set(author.username.clone()),
            content: Set(None),
            excerpt: Set(None),
            cover_image: Set(None),
            image_gallery: Set(None),
            music_url: Set(None),
            local_music: Set(None),
            music_desc: Set(None),
            video_url: Set(None),
            local_video: Set(None),
            video_desc: Set(None),
            views: Set(0),
            likes: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        match input.body {
            PostBody::Article {
                content,
                excerpt,
                cover_image,
            } => {
                let content = content.trim().to_string();
                if content.is_empty() {
                    return Err(AppError::Validation(
                        "Article content must not be empty".to_string(),
                    ));
                }

                let excerpt = excerpt
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| derive_excerpt(&content));

                self.check_cover(cover_image.as_deref())?;

                model.kind = Set(PostKind::Article);
                model.content = Set(Some(content));
                model.excerpt = Set(Some(excerpt));
                model.cover_image = Set(cover_image);
            }
            PostBody::Image {
                content,
                image_gallery,
                cover_image,
            } => {
                // An empty gallery is accepted
                for entry in &image_gallery {
                    validate_inline_media(entry, self.max_inline_bytes)?;
                }

                let cover = cover_image
                    .filter(|c| !c.is_empty())
                    .or_else(|| image_gallery.first().cloned());

                model.kind = Set(PostKind::Image);
                model.content = Set(Some(gallery_caption(content)));
                model.image_gallery = Set(Some(serde_json::json!(image_gallery)));
                model.cover_image = Set(cover);
            }
            PostBody::Music {
                music_url,
                local_music,
                music_desc,
                cover_image,
            } => {
                let music_url = music_url.filter(|s| !s.trim().is_empty());
                let local_music = local_music.filter(|s| !s.is_empty());

                if music_url.is_none() && local_music.is_none() {
                    return Err(AppError::Validation(
                        "A music post needs a music URL or an uploaded file".to_string(),
                    ));
                }
                if let Some(blob) = &local_music {
                    validate_inline_media(blob, self.max_inline_bytes)?;
                }
                self.check_cover(cover_image.as_deref())?;

                model.kind = Set(PostKind::Music);
                model.music_url = Set(music_url);
                model.local_music = Set(local_music);
                model.music_desc = Set(music_desc);
                model.cover_image = Set(cover_image);
            }
            PostBody::Video {
                video_url,
                local_video,
                video_desc,
                cover_image,
            } => {
                let video_url = video_url.filter(|s| !s.trim().is_empty());
                let local_video = local_video.filter(|s| !s.is_empty());

                if video_url.is_none() && local_video.is_none() {
                    return Err(AppError::Validation(
                        "A video post needs a video URL or an uploaded file".to_string(),
                    ));
                }
                if let Some(blob) = &local_video {
                    validate_inline_media(blob, self.max_inline_bytes)?;
                }
                self.check_cover(cover_image.as_deref())?;

                model.kind = Set(PostKind::Video);
                model.video_url = Set(video_url);
                model.local_video = Set(local_video);
                model.video_desc = Set(video_desc);
                model.cover_image = Set(cover_image);
            }
        }

        // Re-checked immediately before the insert; reject, never coerce
        ensure_media_source(&model)?;

        let post = self.post_repo.create(model).await?;

        tracing::info!(
            post_id = %post.id,
            kind = post.kind.as_str(),
            author_id = %post.author_id,
            "Post created"
        );

        Ok(post)
    }

    /// Get a post by ID. Every successful fetch counts one view.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        let mut post = self.post_repo.get_by_id(id).await?;

        self.post_repo.increment_views(id).await?;
        post.views += 1;

        Ok(post)
    }

    /// List posts, newest first.
    pub async fn list(&self, filter: &PostFilter) -> AppResult<Vec<post::Model>> {
        self.post_repo
            .list(filter.category.as_deref(), filter.kind)
            .await
    }

    /// Delete a post. Only its author may.
    pub async fn delete(&self, actor: &user::Model, id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(id).await?;

        if !can_mutate(actor, &post) {
            return Err(AppError::Forbidden(
                "Only the author can delete this post".to_string(),
            ));
        }

        let post_id = post.id.clone();
        self.post_repo.delete(post).await?;

        tracing::info!(post_id = %post_id, actor_id = %actor.id, "Post deleted");

        Ok(())
    }

    /// Covers may be external URLs or inline data URLs; only the latter are
    /// size-checked.
    fn check_cover(&self, cover: Option<&str>) -> AppResult<()> {
        if let Some(c) = cover
            && c.starts_with("data:")
        {
            validate_inline_media(c, self.max_inline_bytes)?;
        }
        Ok(())
    }
}

/// First `EXCERPT_LEN` characters of the content.
fn derive_excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_LEN).collect()
}

/// Caption of an image post, with a stock fallback when none is given.
fn gallery_caption(content: Option<String>) -> String {
    content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| post::DEFAULT_IMAGE_CAPTION.to_string())
}

/// Final pre-insert guard over the variant rules.
fn ensure_media_source(model: &post::ActiveModel) -> AppResult<()> {
    let ActiveValue::Set(kind) = &model.kind else {
        return Err(AppError::Internal("Post kind not set".to_string()));
    };

    let has = |v: &ActiveValue<Option<String>>| {
        matches!(v, ActiveValue::Set(Some(s)) if !s.is_empty())
    };

    let ok = match kind {
        PostKind::Article => has(&model.content),
        PostKind::Image => true,
        PostKind::Music => has(&model.music_url) || has(&model.local_music),
        PostKind::Video => has(&model.video_url) || has(&model.local_video),
    };

    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "A {} post is missing its required source",
            kind.as_str()
        )))
    }
}
