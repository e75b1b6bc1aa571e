//! Post entity.
//!
//! A single table holds all four post kinds. Variant-specific columns are
//! nullable and only populated for the kind they belong to; the service
//! layer enforces which combination is valid.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Caption stored for image posts created without one.
pub const DEFAULT_IMAGE_CAPTION: &str = "This gallery has no caption yet.";

/// Discriminator for the four post variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[sea_orm(string_value = "article")]
    Article,
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "music")]
    Music,
    #[sea_orm(string_value = "video")]
    Video,
}

impl PostKind {
    /// Parse the lowercase wire form used in query strings and payloads.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "article" => Some(Self::Article),
            "image" => Some(Self::Image),
            "music" => Some(Self::Music),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    /// Lowercase wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Image => "image",
            Self::Music => "music",
            Self::Video => "video",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub kind: PostKind,

    pub title: String,

    pub category: String,

    #[sea_orm(indexed)]
    pub author_id: String,

    /// Username snapshot taken at creation time, never refreshed.
    pub author_name: String,

    // Article
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub cover_image: Option<String>,

    // Image gallery, JSON array of inline data URLs
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub image_gallery: Option<Json>,

    // Music
    #[sea_orm(column_type = "Text", nullable)]
    pub music_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub local_music: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub music_desc: Option<String>,

    // Video
    #[sea_orm(column_type = "Text", nullable)]
    pub video_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub local_video: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub video_desc: Option<String>,

    pub views: i32,

    /// Denormalized like count, kept equal to the post_like row count.
    pub likes: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(has_many = "super::post_like::Entity")]
    Likes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
