//! Create post table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Post::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Post::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Post::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Post::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Post::Category).string_len(128).not_null())
                    .col(ColumnDef::new(Post::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Post::AuthorName).string_len(64).not_null())
                    .col(ColumnDef::new(Post::Content).text())
                    .col(ColumnDef::new(Post::Excerpt).text())
                    .col(ColumnDef::new(Post::CoverImage).text())
                    .col(ColumnDef::new(Post::ImageGallery).json_binary())
                    .col(ColumnDef::new(Post::MusicUrl).text())
                    .col(ColumnDef::new(Post::LocalMusic).text())
                    .col(ColumnDef::new(Post::MusicDesc).text())
                    .col(ColumnDef::new(Post::VideoUrl).text())
                    .col(ColumnDef::new(Post::LocalVideo).text())
                    .col(ColumnDef::new(Post::VideoDesc).text())
                    .col(ColumnDef::new(Post::Views).integer().not_null().default(0))
                    .col(ColumnDef::new(Post::Likes).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Post::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Post::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: created_at (listing is newest-first)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_created_at")
                    .table(Post::Table)
                    .col(Post::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: author_id
        manager
            .create_index(
                Index::create()
                    .name("idx_post_author_id")
                    .table(Post::Table)
                    .col(Post::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Index: category + kind (listing filters)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_category_kind")
                    .table(Post::Table)
                    .col(Post::Category)
                    .col(Post::Kind)
                    .to_owned(),
            )
            .await?;

        // Foreign key: author_id -> user.id
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_post_author_id")
                    .from(Post::Table, Post::AuthorId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
    Kind,
    Title,
    Category,
    AuthorId,
    AuthorName,
    Content,
    Excerpt,
    CoverImage,
    ImageGallery,
    MusicUrl,
    LocalMusic,
    MusicDesc,
    VideoUrl,
    LocalVideo,
    VideoDesc,
    Views,
    Likes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
