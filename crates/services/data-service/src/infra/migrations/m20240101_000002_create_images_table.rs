//! Migration: Create images table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Images::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Images::Title).string().not_null())
                    .col(ColumnDef::new(Images::TransformationType).string().not_null())
                    .col(ColumnDef::new(Images::PublicId).string().not_null())
                    .col(ColumnDef::new(Images::SecureUrl).text().not_null())
                    .col(ColumnDef::new(Images::Width).integer().null())
                    .col(ColumnDef::new(Images::Height).integer().null())
                    .col(ColumnDef::new(Images::Config).json().null())
                    .col(ColumnDef::new(Images::TransformationUrl).text().null())
                    .col(ColumnDef::new(Images::AspectRatio).string().null())
                    .col(ColumnDef::new(Images::Color).string().null())
                    .col(ColumnDef::new(Images::Prompt).text().null())
                    // Author is not a foreign key; ownership is checked by callers
                    .col(ColumnDef::new(Images::AuthorId).uuid().null())
                    .col(
                        ColumnDef::new(Images::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Images::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_images_author_id")
                    .table(Images::Table)
                    .col(Images::AuthorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Images {
    Table,
    Id,
    Title,
    TransformationType,
    PublicId,
    SecureUrl,
    Width,
    Height,
    Config,
    TransformationUrl,
    AspectRatio,
    Color,
    Prompt,
    AuthorId,
    CreatedAt,
    UpdatedAt,
}
